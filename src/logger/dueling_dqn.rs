use std::path::{Path, PathBuf};
use std::time::Duration;
use burn::module::Module;
use burn::record::{FullPrecisionSettings, NamedMpkFileRecorder};
use burn::tensor::backend::Backend;
use serde::Serialize;
use crate::config::DeepLearningParams;
use crate::error::{HeadError, Result};
use crate::logger::base_logger::{BaseLogger, RecordBase};

/// Flat tuple so csv::Writer can serialize it
#[derive(Serialize)]
pub struct DuelingDqnCsvRecord(
    usize, // episode
    f32,   // mean_score
    f32,   // mean_duration
    f64,   // total_elapsed_secs
    f64,   // interval_elapsed_secs
    f32,   // mean_loss
    usize, // num_episodes
    usize, // episode_stop
    f32,   // gamma
    f32,   // alpha
    f32,   // start_epsilon
    f32,   // final_epsilon
    usize, // batch_size
    usize, // head_number_layers
    usize, // head_units
    f32,   // softmax_temperature
);

const EXTRA_COLUMNS: [&str; 11] = [
    "mean_loss",
    "num_episodes",
    "episode_stop",
    "gamma",
    "alpha",
    "start_epsilon",
    "final_epsilon",
    "batch_size",
    "head_number_layers",
    "head_units",
    "softmax_temperature",
];

pub struct DuelingDqnLogger {
    base: BaseLogger,
    env_name: String,
    params: DeepLearningParams,
}

impl DuelingDqnLogger {
    pub fn new(base_dir: impl AsRef<Path>, env_name: &str, params: &DeepLearningParams) -> Result<Self> {
        let base = BaseLogger::new(base_dir, &EXTRA_COLUMNS)?;
        Ok(DuelingDqnLogger {
            base,
            env_name: env_name.to_string(),
            params: params.clone(),
        })
    }

    /// log at each `episode_stop` block
    pub fn log(&mut self, episode: usize, mean_score: f32, mean_duration: Duration, mean_loss: f32) -> Result<()> {
        let base: RecordBase = self.base.make_base(episode, mean_score, mean_duration);

        println!(
            "[{}] Dueling DDQN Mean Score: {:.3} / Mean Duration {:.3} / Loss {:.5} (ep {} - {:.2?} elapsed)",
            self.env_name,
            mean_score,
            mean_duration.as_secs_f32(),
            mean_loss,
            episode,
            Duration::from_secs_f64(base.interval_elapsed_secs)
        );

        let p = &self.params;
        self.base.write(DuelingDqnCsvRecord(
            base.episode,
            base.mean_score,
            base.mean_duration.as_secs_f32(),
            base.total_elapsed_secs,
            base.interval_elapsed_secs,
            mean_loss,
            p.num_episodes,
            p.episode_stop,
            p.gamma,
            p.alpha,
            p.start_epsilon,
            p.final_epsilon,
            p.batch_size,
            p.head_number_layers,
            p.head_units,
            p.softmax_temperature,
        ))
    }

    /// save the online model, returns the checkpoint path
    pub fn save_model<M, B>(&self, model: &M, episode: usize) -> Result<PathBuf>
    where
        M: Module<B>,
        B: Backend,
    {
        let path = self.base.run_dir().join(format!("dueling_ddqn_model_{episode}"));
        let recorder = NamedMpkFileRecorder::<FullPrecisionSettings>::new();
        model
            .clone()
            .save_file(path.clone(), &recorder)
            .map_err(|err| HeadError::Recorder(format!("{err:?}")))?;
        Ok(path.with_extension("mpk"))
    }

    pub fn run_dir(&self) -> &PathBuf { self.base.run_dir() }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rows_match_header_width() {
        let dir = tempfile::tempdir().unwrap();
        let mut logger = DuelingDqnLogger::new(dir.path(), "LineWorld", &DeepLearningParams::default()).unwrap();
        logger.log(100, 0.25, Duration::from_millis(4), 0.01).unwrap();
        logger.log(200, 0.75, Duration::from_millis(4), 0.005).unwrap();

        let mut reader = csv::Reader::from_path(logger.run_dir().join("metadata.csv")).unwrap();
        let width = reader.headers().unwrap().len();
        let rows: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
        assert_eq!(width, 16);
        assert_eq!(rows.len(), 2);
        assert!(rows.iter().all(|r| r.len() == width));
        assert_eq!(&rows[1][0], "200");
    }
}

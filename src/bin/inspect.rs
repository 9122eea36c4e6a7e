use burn::prelude::*;
use burn::tensor::Distribution;
use dueling_q_head::config::CpuBackend;
use dueling_q_head::heads::{softmax_with_temperature, Activation, DuelingQHeadConfig, QHeadConfig};
use dueling_q_head::Result;

const INPUT_FEATURES: usize = 8;
const NUM_ACTIONS: usize = 4;
const BATCH: usize = 3;

fn print_rows(label: &str, tensor: Tensor<CpuBackend, 2>) {
    let [rows, cols] = tensor.dims();
    let values = tensor.into_data().to_vec::<f32>().unwrap_or_default();
    println!("\n=== {} [{} x {}] ===", label, rows, cols);
    for (i, row) in values.chunks(cols.max(1)).enumerate() {
        let cells: Vec<String> = row.iter().map(|v| format!("{v:>8.4}")).collect();
        println!("state {:>2}: [{}]", i, cells.join(", "));
    }
}

/// Usage: inspect [number_layers] [units] [activation] [temperature]
fn main() -> Result<()> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let number_layers = args.first().and_then(|s| s.parse().ok()).unwrap_or(2);
    let units = args.get(1).and_then(|s| s.parse().ok()).unwrap_or(16);
    let activation = match args.get(2) {
        Some(name) => name.parse::<Activation>()?,
        None => Activation::Relu,
    };
    let temperature = args.get(3).and_then(|s| s.parse().ok()).unwrap_or(1.0f32);

    let device = Default::default();
    let head = DuelingQHeadConfig::new(INPUT_FEATURES, NUM_ACTIONS)
        .with_number_layers(number_layers)
        .with_units(units)
        .with_activation(activation)
        .with_softmax_temperature(temperature)
        .init::<CpuBackend>(&device)?;

    println!("=== ARCHITECTURE ({} activation) ===", head.activation());
    println!("{}", head.describe());
    let plain = QHeadConfig::new(INPUT_FEATURES, NUM_ACTIONS).init::<CpuBackend>(&device)?;
    println!("\n=== PLAIN Q HEAD ===");
    println!("{}", plain.describe());

    let batch = Tensor::<CpuBackend, 2>::random([BATCH, INPUT_FEATURES], Distribution::Normal(0.0, 1.0), &device);
    let out = head.forward_streams(batch.clone());

    print_rows("STATE VALUE V", out.state_value.clone());
    print_rows("CENTRED ADVANTAGE A - mean(A)", out.advantage.clone());
    print_rows("ADVANTAGE ROW SUMS (should be ~0)", out.advantage.sum_dim(1));
    print_rows("Q = V + A", out.q_values.clone());
    print_rows("MEAN Q - V (should be ~0)", out.q_values.clone().mean_dim(1) - out.state_value);
    print_rows(&format!("SOFTMAX (T = {temperature})"), head.softmax(batch));
    print_rows("SOFTMAX (T = 10)", softmax_with_temperature(out.q_values, 10.0));

    Ok(())
}

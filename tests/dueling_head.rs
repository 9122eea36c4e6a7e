use burn::backend::{Autodiff, NdArray};
use burn::module::AutodiffModule;
use burn::optim::{AdamConfig, GradientsParams, Optimizer};
use burn::prelude::*;
use burn::tensor::{Distribution, ElementConversion};
use dueling_q_head::heads::{Activation, DuelingQHead, DuelingQHeadConfig, QHeadConfig, QLossType, QValueHead};

type TestBackend = NdArray;
type TrainBackend = Autodiff<NdArray>;

fn rows(t: Tensor<TestBackend, 2>) -> Vec<Vec<f32>> {
    let [_, cols] = t.dims();
    t.into_data().to_vec::<f32>().unwrap().chunks(cols).map(|r| r.to_vec()).collect()
}

#[test]
fn dueling_and_plain_heads_share_the_contract() {
    let device = Default::default();
    let input = Tensor::<TestBackend, 2>::random([4, 12], Distribution::Normal(0.0, 1.0), &device);

    let dueling = DuelingQHeadConfig::new(12, 6).with_units(32).init::<TestBackend>(&device).unwrap();
    let plain = QHeadConfig::new(12, 6).init::<TestBackend>(&device).unwrap();

    fn check<H: QValueHead<TestBackend>>(head: &H, input: Tensor<TestBackend, 2>) {
        assert_eq!(head.num_actions(), 6);
        assert_eq!(head.q_values(input.clone()).dims(), [4, 6]);
        for row in rows(head.softmax_with_temperature(input)) {
            assert!((row.iter().sum::<f32>() - 1.0).abs() < 1e-5);
        }
    }
    check(&dueling, input.clone());
    check(&plain, input);
}

#[test]
fn every_activation_keeps_advantages_centred() {
    let device = Default::default();
    let input = Tensor::<TestBackend, 2>::random([3, 5], Distribution::Normal(0.0, 2.0), &device);

    for activation in [Activation::Relu, Activation::Tanh, Activation::Sigmoid, Activation::LeakyRelu, Activation::Gelu, Activation::None] {
        let head = DuelingQHeadConfig::new(5, 7)
            .with_number_layers(2)
            .with_units(8)
            .with_activation(activation)
            .init::<TestBackend>(&device)
            .unwrap();
        let out = head.forward_streams(input.clone());
        for sum in out.advantage.sum_dim(1).into_data().to_vec::<f32>().unwrap() {
            assert!(sum.abs() < 1e-4, "{activation}: advantage row sum {sum}");
        }
    }
}

#[test]
fn single_action_q_equals_state_value() {
    let device = Default::default();
    let head = DuelingQHeadConfig::new(4, 1).with_units(8).init::<TestBackend>(&device).unwrap();
    let out = head.forward_streams(Tensor::<TestBackend, 2>::ones([2, 4], &device));
    let q = out.q_values.into_data().to_vec::<f32>().unwrap();
    let v = out.state_value.into_data().to_vec::<f32>().unwrap();
    assert_eq!(q, v);
}

#[test]
fn temperature_ranks_actions_identically() {
    let device = Default::default();
    let input = Tensor::<TestBackend, 2>::random([2, 6], Distribution::Normal(0.0, 1.0), &device);
    let sharp: DuelingQHead<TestBackend> = DuelingQHeadConfig::new(6, 5)
        .with_units(16)
        .with_softmax_temperature(0.1)
        .init(&device)
        .unwrap();

    let q = rows(sharp.forward(input.clone()));
    let p = rows(sharp.softmax(input));
    for (q_row, p_row) in q.iter().zip(p.iter()) {
        let q_best = q_row.iter().enumerate().max_by(|a, b| a.1.total_cmp(b.1)).unwrap().0;
        let p_best = p_row.iter().enumerate().max_by(|a, b| a.1.total_cmp(b.1)).unwrap().0;
        assert_eq!(q_best, p_best);
    }
}

#[test]
fn head_regresses_towards_targets() {
    let device = Default::default();
    let mut head = DuelingQHeadConfig::new(3, 2)
        .with_units(16)
        .with_loss_type(QLossType::Huber { delta: 1.0 })
        .init::<TrainBackend>(&device)
        .unwrap();
    let mut optimizer = AdamConfig::new().init::<TrainBackend, DuelingQHead<TrainBackend>>();

    let input = Tensor::<TrainBackend, 2>::from_floats([[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]], &device);
    let targets = Tensor::<TrainBackend, 2>::from_floats([[1.0, -1.0], [0.5, 0.5], [-1.0, 2.0]], &device);

    let loss_of = |head: &DuelingQHead<TrainBackend>| -> f32 {
        let q = head.valid().forward(input.clone().inner());
        (q - targets.clone().inner()).powf_scalar(2.0).mean().into_scalar().elem::<f32>()
    };

    let before = loss_of(&head);
    for _ in 0..200 {
        let q = head.forward(input.clone());
        let loss = head.loss(q, targets.clone(), None);
        let grads = GradientsParams::from_grads(loss.backward(), &head);
        head = optimizer.step(1e-2, head, grads);
    }
    let after = loss_of(&head);

    assert!(after < before * 0.1, "loss went from {before} to {after}");
}

use std::process::exit;
use std::time::{Duration, Instant};

use pixelkit::image::saturating_add::{
    vector_adder, IncrementPattern, SaturatingAdder, ScalarAdder,
};
use pixelkit::image::PixelBuffer;

const IMAGE_WIDTH: usize = 3840;
const IMAGE_HEIGHT: usize = 2160;
const IMAGE_COMPONENTS: usize = 4;
const INCREMENTS: [u8; IMAGE_COMPONENTS] = [64, 64, 64, 0];

const NUMBER_OF_ROUNDS: u32 = 100;

fn create_test_image() -> PixelBuffer<u8> {
    let samples = (0..IMAGE_WIDTH * IMAGE_HEIGHT * IMAGE_COMPONENTS)
        .map(|index| {
            let pixel = index / IMAGE_COMPONENTS;
            let x = pixel % IMAGE_WIDTH;
            let y = pixel / IMAGE_WIDTH;
            ((x + y * 8) % 256) as u8
        })
        .collect();
    PixelBuffer::from_samples(IMAGE_WIDTH, IMAGE_HEIGHT, IMAGE_COMPONENTS, samples)
        .expect("Test image shape is valid")
}

fn calculate_std_deviation_in_micros(mean: &Duration, measurements: &[Duration]) -> u64 {
    let mean_micros = mean.as_micros() as i128;
    let sum = measurements
        .iter()
        .map(|m| m.as_micros() as i128 - mean_micros)
        .map(|v| v.pow(2).unsigned_abs())
        .sum::<u128>();
    let variance = sum / measurements.len() as u128;
    (variance as f64).sqrt().round() as u64
}

fn measure(
    adder: &dyn SaturatingAdder,
    pattern: &IncrementPattern,
    image: &PixelBuffer<u8>,
) -> (PixelBuffer<u8>, Vec<Duration>) {
    let mut durations: Vec<Duration> = Vec::new();
    let mut result = image.clone();
    for _ in 0..NUMBER_OF_ROUNDS {
        result.samples_mut().copy_from_slice(image.samples());
        let start = Instant::now();
        adder.add(result.samples_mut(), pattern);
        durations.push(start.elapsed());
    }
    (result, durations)
}

fn report(name: &str, durations: &[Duration]) {
    let min_duration = durations.iter().min().copied().unwrap_or_default();
    let max_duration = durations.iter().max().copied().unwrap_or_default();
    let avg_duration = durations.iter().sum::<Duration>() / NUMBER_OF_ROUNDS;
    let std_deviation = calculate_std_deviation_in_micros(&avg_duration, durations);

    println!(
        "{:>8} Min: {}, Max: {}, Average: {}, Std Deviation: {}",
        name,
        min_duration.as_micros(),
        max_duration.as_micros(),
        avg_duration.as_micros(),
        std_deviation,
    );
}

fn main() {
    println!("Creating test image");
    let test_image = create_test_image();
    let Some(pattern) = IncrementPattern::new(&INCREMENTS) else {
        eprintln!("No increments given");
        exit(1);
    };

    println!("Timing scalar addition over {} rounds", NUMBER_OF_ROUNDS);
    let (scalar_result, scalar_durations) = measure(&ScalarAdder, &pattern, &test_image);
    report("scalar", &scalar_durations);

    let Some(vector) = vector_adder() else {
        println!("No vectorized adder available on this CPU");
        return;
    };
    println!("Timing {} addition over {} rounds", vector.name(), NUMBER_OF_ROUNDS);
    let (vector_result, vector_durations) = measure(vector.as_ref(), &pattern, &test_image);
    report(vector.name(), &vector_durations);

    if scalar_result != vector_result {
        eprintln!("Scalar and {} results differ", vector.name());
        exit(1);
    }
    println!("Results match");
}

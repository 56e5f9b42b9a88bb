use criterion::{criterion_group, criterion_main};

use tempovox::tsp::{TspBuilder, TspConfig};

fn criterion_benchmark(c: &mut criterion::Criterion) {
    let dir = tempfile::TempDir::new().ok().unwrap();
    let input_path = dir.path().join("volume.in");
    let output_path = dir.path().join("volume.tsp");

    // 64^3 volume over 4 timesteps, carved into 16^3 bricks
    let (timesteps, volume_dim, brick_dim) = (4u32, 64u32, 16u32);
    let mut bytes = Vec::new();
    for field in [1u32, timesteps, volume_dim, volume_dim, volume_dim] {
        bytes.extend_from_slice(&field.to_le_bytes());
    }
    for index in 0..timesteps * volume_dim.pow(3) {
        bytes.extend_from_slice(&((index % 251) as f32).to_le_bytes());
    }
    std::fs::write(&input_path, bytes).ok().unwrap();

    c.bench_function("tsp pipeline", |b| {
        b.iter(|| {
            let builder = TspBuilder::new(TspConfig {
                input_path: input_path.clone(),
                output_path: output_path.clone(),
                brick_dim,
                padding_width: 0,
                structure: 0,
            });
            builder.construct().ok().unwrap();
        })
    });
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);

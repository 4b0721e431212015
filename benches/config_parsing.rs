//! Benchmark for config parsing, which runs on every CLI invocation

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use std::path::Path;

fn bench_config_load_from_file(c: &mut Criterion) {
    let config_path = Path::new("vidnote.example.toml");

    c.bench_function("config_parse_from_file", |b| {
        b.iter(|| {
            let config = vidnote::config::VidnoteConfig::load(Some(black_box(config_path)));
            black_box(config)
        });
    });
}

fn bench_config_load_defaults(c: &mut Criterion) {
    c.bench_function("config_parse_defaults_only", |b| {
        b.iter(|| {
            let config = vidnote::config::VidnoteConfig::load(None);
            black_box(config)
        });
    });
}

fn bench_config_toml_parsing(c: &mut Criterion) {
    let toml_content = r#"
[api]
key = "sk-bench"
selected_host = "mirror"
timeout_seconds = 30

[[api.hosts]]
id = "default"
name = "Mainland direct"
url = "https://grsai.dakka.com.cn"

[[api.hosts]]
id = "overseas"
name = "Overseas"
url = "https://api.grsai.com"

[[api.hosts]]
id = "mirror"
name = "Mirror"
url = "https://mirror.example.com"
description = "Team mirror"

[generation]
default_model = "kling-1"
default_aspect_ratio = "9:16"
default_duration = 5

[[models]]
id = "sora-2"
name = "Sora 2.0"
value = "sora-2"

[[models]]
id = "custom_1"
name = "Kling"
value = "kling-1"
custom = true

[polling]
interval_ms = 1500
max_attempts = 200

[output]
folder = "videos"

[logging]
level = "debug"
format = "json"

[logging.component_levels]
poll = "trace"
api = "debug"
"#;

    c.bench_function("config_parse_complex_toml", |b| {
        b.iter(|| {
            let config: vidnote::config::VidnoteConfig =
                toml::from_str(black_box(toml_content)).unwrap();
            black_box(config)
        });
    });
}

fn bench_config_validate(c: &mut Criterion) {
    let config = vidnote::config::VidnoteConfig::default();

    c.bench_function("config_validate", |b| {
        b.iter(|| black_box(&config).validate());
    });
}

criterion_group!(
    benches,
    bench_config_load_from_file,
    bench_config_load_defaults,
    bench_config_toml_parsing,
    bench_config_validate
);
criterion_main!(benches);

use std::{sync::Arc, time::Instant};

use lumen::{
    color::ColorModel,
    expect,
    integrators::{Bidirectional, BidirectionalParams, Integrator, Metropolis, MetropolisParams},
    math::Point2,
    path::{Path, PathEvaluator, SubpathTracer, DEFAULT_MAX_DEPTH},
    scene::Scene,
    settings::RenderSettings,
};

const ITERATIONS: u64 = 20000;
const RESOLUTION: (u16, u16) = (32, 32);

fn setup_logger() -> Result<(), fern::InitError> {
    fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!(
                "{}[{}][{}:{}] {}",
                chrono::Local::now().format("[%Y-%m-%d][%H:%M:%S]"),
                record.level(),
                record.target(),
                record.line().unwrap_or(0),
                message
            ))
        })
        .level(log::LevelFilter::Info)
        // .level(log::LevelFilter::Debug)
        .chain(std::io::stdout())
        .chain(std::fs::File::create("lumen.log")?)
        .apply()?;
    Ok(())
}

fn print_timing(name: &str, start: Instant, count: u64) {
    let elapsed_ns = start.elapsed().as_nanos();
    let elapsed_ms = (elapsed_ns as f64) * 1e-6;
    let us_per_iter = (elapsed_ns as f64) * 1e-3 / (count as f64);
    println!(
        "{:<12} took {:6.1} ms total, {:0.4} us per iteration",
        name, elapsed_ms, us_per_iter
    );
}

fn pixel(i: u64) -> Point2 {
    let w = RESOLUTION.0 as u64;
    Point2::new(
        (i % w) as f64 + 0.5,
        ((i / w) % (RESOLUTION.1 as u64)) as f64 + 0.5,
    )
}

fn bench_subpaths(tracer: &SubpathTracer) {
    let start = Instant::now();
    let mut vertex_count = 0;
    for i in 0..ITERATIONS {
        let (ctx, mut rng) = tracer.context(0, i);
        if let Some(eye) = expect!(tracer.sample_eye(pixel(i), &ctx, &mut rng), "Eye subpath failed") {
            vertex_count += eye.depth() + 1;
        }
        if let Some(light) = expect!(tracer.sample_light(&ctx, &mut rng), "Light subpath failed") {
            vertex_count += light.depth() + 1;
        }
    }
    print_timing("Subpaths", start, ITERATIONS);
    println!("  {} vertices", vertex_count);
}

fn bench_evaluation(tracer: &SubpathTracer) {
    let evaluator = PathEvaluator::new();
    let mut paths = Vec::new();
    for i in 0..ITERATIONS {
        let (ctx, mut rng) = tracer.context(1, i);
        let eye = expect!(tracer.sample_eye(pixel(i), &ctx, &mut rng), "Eye subpath failed");
        let light = expect!(tracer.sample_light(&ctx, &mut rng), "Light subpath failed");
        if let (Some(eye), Some(light)) = (eye, light) {
            paths.push(expect!(Path::join(light, eye), "Join failed"));
        }
    }

    let start = Instant::now();
    let mut total = 0.0;
    for path in &paths {
        total += expect!(evaluator.combine(path), "Evaluation failed").sum();
    }
    print_timing("Evaluation", start, paths.len() as u64);
    if total.is_nan() {
        panic!("We only wanted to force the loop to be executed!")
    }
}

fn bench_render(name: &str, integrator: &dyn Integrator, scene: &Arc<Scene>) {
    let settings = RenderSettings {
        resolution: RESOLUTION,
        ..RenderSettings::default()
    };
    let start = Instant::now();
    let result = expect!(integrator.render(scene, &settings), "Render failed");
    print_timing(name, start, result.path_count as u64);
    println!("  mean {:?}", result.mean());
}

fn main() {
    if let Err(why) = setup_logger() {
        panic!("{}", why);
    };

    let scene = match Scene::cornell_box(RESOLUTION) {
        Some(scene) => Arc::new(scene),
        None => panic!("Failed to build the benchmark scene"),
    };
    let tracer = SubpathTracer::new(scene.clone(), ColorModel::Rgb, DEFAULT_MAX_DEPTH);

    bench_subpaths(&tracer);
    bench_evaluation(&tracer);
    bench_render(
        "Bidirectional",
        &Bidirectional::new(BidirectionalParams::default()),
        &scene,
    );
    bench_render(
        "Metropolis",
        &Metropolis::new(MetropolisParams::default()),
        &scene,
    );
}

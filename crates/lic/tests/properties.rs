//! End-to-end behavior of the public entry points.

use lic_core::texture::uniform_noise;
use lic_core::{
    Backend, Boundary, DVec2, KernelShape, LicConfig, LicError, LicParams, NoiseSource,
    ScalarField, VectorField,
};
use lic_engine::{compute_lic, compute_lic_with_postprocessing};
use proptest::prelude::*;

/// Solid rotation about the grid centre.
fn vortex(n: usize) -> VectorField {
    let c = (n as f64 - 1.0) / 2.0;
    VectorField::from_fn(n, n, |r, col| {
        DVec2::new(-(r as f64 - c), col as f64 - c)
    })
    .unwrap()
}

fn swirls(n: usize) -> VectorField {
    VectorField::from_fn(n, n, |r, c| {
        let x = c as f64 / n as f64 * 20.0 - 10.0;
        let y = r as f64 / n as f64 * 20.0 - 10.0;
        DVec2::new(
            ((x + y) / std::f64::consts::TAU).sin(),
            ((x - y) / std::f64::consts::TAU).cos(),
        )
    })
    .unwrap()
}

fn params(streamlength: f64, backend: Backend) -> LicParams {
    LicParams {
        backend,
        ..LicParams::with_streamlength(streamlength)
    }
}

fn config(p: &LicParams, n: usize) -> LicConfig {
    LicConfig::resolve(p, n, n).unwrap()
}

/// Pearson correlation between each annulus pixel and the pixel `lag` cells
/// further along the rotation.
fn along_flow_correlation(field: &ScalarField, lag: f64) -> f64 {
    let n = field.rows();
    let c = (n as f64 - 1.0) / 2.0;
    let mut pairs = Vec::new();
    for r in 0..n {
        for col in 0..n {
            let rel = DVec2::new(col as f64 - c, r as f64 - c);
            let radius = rel.length();
            if radius < 8.0 || radius > c - 8.0 {
                continue;
            }
            let dir = DVec2::new(-rel.y, rel.x) / radius;
            let ahead = DVec2::new(col as f64, r as f64) + dir * lag;
            let (ar, ac) = (ahead.y.round() as usize, ahead.x.round() as usize);
            if let (Some(a), Some(b)) = (field.get(r, col), field.get(ar, ac)) {
                pairs.push((a, b));
            }
        }
    }
    let len = pairs.len() as f64;
    let (ma, mb) = pairs
        .iter()
        .fold((0.0, 0.0), |(x, y), (a, b)| (x + a / len, y + b / len));
    let (mut cov, mut va, mut vb) = (0.0, 0.0, 0.0);
    for (a, b) in &pairs {
        cov += (a - ma) * (b - mb);
        va += (a - ma).powi(2);
        vb += (b - mb).powi(2);
    }
    cov / (va * vb).sqrt()
}

#[test]
fn constant_texture_along_uniform_flow_stays_constant() {
    let vfield = VectorField::uniform(4, 4, DVec2::X).unwrap();
    let texture = ScalarField::filled(4, 4, 1.0).unwrap();
    let cfg = config(&params(2.0, Backend::Serial), 4);
    let out = compute_lic(&vfield, &texture, &cfg).unwrap();
    assert_eq!(out.shape(), (4, 4));
    assert!(out.data().iter().all(|v| (v - 1.0).abs() < 1e-12));
}

#[test]
fn texture_values_near_f64_max_stay_finite() {
    let vfield = VectorField::uniform(4, 4, DVec2::X).unwrap();
    let texture = ScalarField::filled(4, 4, 1e308).unwrap();
    for backend in [Backend::Serial, Backend::Parallel] {
        let out = compute_lic(&vfield, &texture, &config(&params(2.0, backend), 4)).unwrap();
        assert!(
            out.data().iter().all(|v| (v / 1e308 - 1.0).abs() < 1e-12),
            "{backend:?}"
        );
    }
}

#[test]
fn config_for_another_grid_is_rejected_by_both_backends() {
    let vfield = VectorField::uniform(4, 4, DVec2::X).unwrap();
    let texture = uniform_noise(4, 4, 1).unwrap();
    for backend in [Backend::Serial, Backend::Parallel] {
        let cfg = config(&params(2.0, backend), 8);
        assert!(
            matches!(
                compute_lic(&vfield, &texture, &cfg),
                Err(LicError::DimensionMismatch { .. })
            ),
            "{backend:?}"
        );
    }
}

#[test]
fn serial_runs_are_deterministic() {
    let vfield = swirls(48);
    let texture = uniform_noise(48, 48, 11).unwrap();
    let cfg = config(&params(8.0, Backend::Serial), 48);
    let a = compute_lic(&vfield, &texture, &cfg).unwrap();
    let b = compute_lic(&vfield, &texture, &cfg).unwrap();
    assert_eq!(a, b);
}

#[test]
fn full_pipeline_is_deterministic_for_a_seed() {
    let vfield = swirls(32);
    let p = LicParams {
        num_passes: 2,
        num_repetitions: 2,
        use_filter: true,
        use_equalize: true,
        filter_sigma: 2.0,
        ..params(6.0, Backend::Parallel)
    };
    let noise = NoiseSource::Uniform { seed: p.seed };
    let a = compute_lic_with_postprocessing(&vfield, &noise, &p).unwrap();
    let b = compute_lic_with_postprocessing(&vfield, &noise, &p).unwrap();
    assert_eq!(a, b);
}

#[test]
fn parallel_backend_equals_serial_backend() {
    let vfield = swirls(50);
    let texture = uniform_noise(50, 50, 4).unwrap();
    for boundary in [Boundary::Closed, Boundary::Periodic] {
        for kernel in [KernelShape::Box, KernelShape::Hann] {
            let serial = LicParams {
                boundary,
                kernel,
                ..params(10.0, Backend::Serial)
            };
            let parallel = LicParams {
                backend: Backend::Parallel,
                num_workers: Some(5),
                ..serial.clone()
            };
            let a = compute_lic(&vfield, &texture, &config(&serial, 50)).unwrap();
            let b = compute_lic(&vfield, &texture, &config(&parallel, 50)).unwrap();
            assert_eq!(a, b, "{boundary:?} {kernel:?}");
        }
    }
}

#[test]
fn zero_field_passes_texture_through() {
    let vfield = VectorField::uniform(9, 13, DVec2::ZERO).unwrap();
    let texture = uniform_noise(9, 13, 8).unwrap();
    for backend in [Backend::Serial, Backend::Parallel] {
        let p = params(5.0, backend);
        let cfg = LicConfig::resolve(&p, 9, 13).unwrap();
        assert_eq!(compute_lic(&vfield, &texture, &cfg).unwrap(), texture);
    }
}

#[test]
fn more_passes_lengthen_streaks_along_the_flow() {
    let n = 64;
    let vfield = vortex(n);
    let run = |passes: usize| {
        let p = LicParams {
            num_passes: passes,
            ..params(6.0, Backend::Parallel)
        };
        compute_lic_with_postprocessing(&vfield, &NoiseSource::Uniform { seed: 3 }, &p).unwrap()
    };
    let one = along_flow_correlation(&run(1), 4.0);
    let two = along_flow_correlation(&run(2), 4.0);
    let three = along_flow_correlation(&run(3), 4.0);
    assert!(one > 0.2, "single pass correlation {one}");
    assert!(two > one, "{two} <= {one}");
    assert!(three > two, "{three} <= {two}");
}

#[test]
fn equalized_output_spans_unit_interval_uniformly() {
    let n = 40;
    let p = LicParams {
        use_equalize: true,
        ..params(8.0, Backend::Serial)
    };
    let out =
        compute_lic_with_postprocessing(&vortex(n), &NoiseSource::Uniform { seed: 6 }, &p).unwrap();
    assert_eq!(out.min_max(), (0.0, 1.0));
    let mut sorted = out.into_data();
    sorted.sort_by(f64::total_cmp);
    let len = sorted.len() as f64;
    let ks = sorted
        .iter()
        .enumerate()
        .map(|(i, &x)| (x - i as f64 / len).abs().max(((i + 1) as f64 / len - x).abs()))
        .fold(0.0, f64::max);
    assert!(ks < 0.02, "KS statistic {ks}");
}

#[test]
fn supplied_texture_with_wrong_shape_is_rejected() {
    let noise = NoiseSource::Supplied(ScalarField::filled(3, 3, 0.5).unwrap());
    let result = compute_lic_with_postprocessing(
        &VectorField::uniform(4, 4, DVec2::X).unwrap(),
        &noise,
        &params(2.0, Backend::Serial),
    );
    assert!(matches!(result, Err(LicError::DimensionMismatch { .. })));
}

#[test]
fn invalid_options_are_reported() {
    let vfield = VectorField::uniform(4, 4, DVec2::X).unwrap();
    let noise = NoiseSource::Uniform { seed: 1 };
    let cases = [
        (params(-1.0, Backend::Serial), "streamlength"),
        (
            LicParams {
                step_size: 0.0,
                ..params(2.0, Backend::Serial)
            },
            "step",
        ),
        (
            LicParams {
                num_passes: 0,
                ..params(2.0, Backend::Serial)
            },
            "num_passes",
        ),
    ];
    for (p, needle) in cases {
        let err = compute_lic_with_postprocessing(&vfield, &noise, &p).unwrap_err();
        assert!(err.to_string().contains(needle), "{err}");
    }
}

#[test]
fn json_options_drive_the_pipeline() {
    let p = LicParams::from_json(&serde_json::json!({
        "streamlength": 3.0,
        "backend": "serial",
        "boundary": "periodic",
        "kernel": "hann",
        "num_repetitions": 2,
    }))
    .unwrap();
    let noise = NoiseSource::Uniform { seed: 2 };
    let out = compute_lic_with_postprocessing(&swirls(16), &noise, &p).unwrap();
    assert_eq!(out.shape(), (16, 16));
    assert!(out.first_non_finite().is_none());
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    #[test]
    fn output_matches_input_shape_and_stays_finite(
        rows in 1usize..14,
        cols in 1usize..14,
        angle in 0.0f64..std::f64::consts::TAU,
        streamlength in 0.5f64..12.0,
        periodic in any::<bool>(),
        seed in any::<u64>(),
    ) {
        let vfield = VectorField::uniform(rows, cols, DVec2::from_angle(angle)).unwrap();
        let texture = uniform_noise(rows, cols, seed).unwrap();
        let p = LicParams {
            boundary: if periodic { Boundary::Periodic } else { Boundary::Closed },
            ..params(streamlength, Backend::Parallel)
        };
        let cfg = LicConfig::resolve(&p, rows, cols).unwrap();
        let out = compute_lic(&vfield, &texture, &cfg).unwrap();
        prop_assert_eq!(out.shape(), (rows, cols));
        prop_assert!(out.first_non_finite().is_none());
        // a weighted mean of [0, 1) samples
        let (lo, hi) = out.min_max();
        prop_assert!(lo >= 0.0 && hi <= 1.0);
    }

    #[test]
    fn edge_seeds_on_outward_flow_terminate_finite(n in 2usize..20, seed in any::<u64>()) {
        // radial outflow: every edge seed immediately heads off the grid
        let c = (n as f64 - 1.0) / 2.0;
        let vfield = VectorField::from_fn(n, n, |r, col| {
            DVec2::new(col as f64 - c, r as f64 - c)
        }).unwrap();
        let texture = uniform_noise(n, n, seed).unwrap();
        let cfg = LicConfig::resolve(&params(n as f64, Backend::Serial), n, n).unwrap();
        let out = compute_lic(&vfield, &texture, &cfg).unwrap();
        prop_assert!(out.first_non_finite().is_none());
    }
}

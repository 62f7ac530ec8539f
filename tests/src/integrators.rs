#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;
    use std::{f64::consts::PI, sync::Arc};

    use lumen::{
        integrators::{
            Bidirectional, BidirectionalParams, Integrator, IntegratorType, Metropolis,
            MetropolisParams,
        },
        math::{Point2, Point3, Spectrum},
        sampling::get_2d,
        scene::Scene,
        settings::RenderSettings,
        Error,
    };

    use crate::scenes;

    fn settings() -> RenderSettings {
        RenderSettings {
            resolution: (4, 4),
            max_depth: 4,
            seed: 11,
            use_single_render_thread: true,
            ..RenderSettings::default()
        }
    }

    fn cornell_box() -> Arc<Scene> {
        Arc::new(Scene::cornell_box((4, 4)).unwrap())
    }

    fn assert_valid(pixels: &[Spectrum]) {
        for p in pixels {
            assert!(p.is_finite());
            assert!(!p.has_negatives());
        }
    }

    #[test]
    fn bidirectional_is_deterministic() {
        let scene = cornell_box();
        let integrator = Bidirectional::new(BidirectionalParams {
            samples_per_pixel: 2,
        });

        let first = integrator.render(&scene, &settings()).unwrap();
        assert_eq!(first.resolution, (4, 4));
        assert_eq!(first.pixels.len(), 16);
        assert_valid(&first.pixels);
        assert!(first.mean().sum() > 0.0);

        let second = integrator.render(&scene, &settings()).unwrap();
        assert_eq!(first.pixels, second.pixels);
    }

    #[test]
    fn bidirectional_pixel_matches_direct_light() {
        // The floor is lit only by the point light, everything else escapes
        let intensity = 2.0;
        let scene = scenes::point_lit_floor(Point3::new(0.0, 0.0, 1.0), Spectrum::splat(intensity));
        let tracer = scenes::tracer(&scene);
        let integrator = Bidirectional::new(BidirectionalParams {
            samples_per_pixel: 1,
        });
        let pixel_index = 4 * 8 + 4;
        let estimate = integrator.estimate(&tracer, 0, pixel_index).unwrap();

        // Replay the sample's eye ray to find the floor point it saw
        let (ctx, mut rng) = tracer.context(0, pixel_index as u64);
        let pixel = Point2::new(4.0, 4.0) + get_2d(&mut rng);
        let eye = tracer.trace_eye(pixel, &ctx).unwrap();
        let floor = tracer.step(&eye, &mut rng).unwrap().unwrap();
        let p = floor.point().unwrap();
        assert_abs_diff_eq!(p.z, 0.0, epsilon = 1e-12);

        let r_sqr = p.x * p.x + p.y * p.y + 1.0;
        let cos = 1.0 / r_sqr.sqrt();
        let expected = intensity / r_sqr * (scenes::FLOOR_ALBEDO / PI) * cos;
        assert_abs_diff_eq!(estimate, Spectrum::splat(expected), epsilon = 1e-9);
    }

    #[test]
    fn metropolis_renders_cornell_box() {
        let scene = cornell_box();
        let integrator = Metropolis::new(MetropolisParams {
            bootstrap_samples: 256,
            chains: 4,
            mutations_per_pixel: 8,
            emission_samples: 1,
            ..MetropolisParams::default()
        });

        let result = integrator.render(&scene, &settings()).unwrap();
        assert_eq!(result.pixels.len(), 16);
        assert_valid(&result.pixels);
        assert!(result.mean().sum() > 0.0);
    }

    #[test]
    fn metropolis_without_light_paths() {
        // Only emission reaches the image when the light can't be connected to
        let background = Spectrum::splat(0.5);
        let scene = scenes::empty(background);
        let integrator = Metropolis::new(MetropolisParams {
            bootstrap_samples: 16,
            chains: 2,
            ..MetropolisParams::default()
        });

        let settings = RenderSettings {
            resolution: (8, 8),
            ..settings()
        };
        let result = integrator.render(&scene, &settings).unwrap();
        assert_eq!(result.pixels.len(), 64);
        for p in &result.pixels {
            assert_abs_diff_eq!(*p, background, epsilon = 1e-12);
        }
    }

    #[test]
    fn integrator_from_settings() {
        let settings = RenderSettings::from_yaml_str(
            "resolution: [4, 4]\nintegrator: !Metropolis\n  bootstrap_samples: 32\n  chains: 2\n  mutations_per_pixel: 2\n  max_change: 1\n  light_mutation_probability: 0.5\n  emission_samples: 1\nuse_single_render_thread: true\n",
        )
        .unwrap();
        assert!(matches!(
            settings.integrator,
            IntegratorType::Metropolis(MetropolisParams { chains: 2, .. })
        ));

        let scene = cornell_box();
        let result = settings
            .integrator
            .instantiate()
            .render(&scene, &settings)
            .unwrap();
        assert_eq!(result.pixels.len(), 16);
        assert_valid(&result.pixels);

        let mismatched = RenderSettings {
            resolution: (8, 4),
            ..settings
        };
        assert!(matches!(
            Bidirectional::new(BidirectionalParams::default()).render(&scene, &mismatched),
            Err(Error::Settings(_))
        ));
        assert!(matches!(
            Metropolis::new(MetropolisParams::default()).render(&scene, &mismatched),
            Err(Error::Settings(_))
        ));

        assert_eq!(
            "Bidirectional".parse::<IntegratorType>().unwrap(),
            IntegratorType::Bidirectional(BidirectionalParams::default())
        );
    }
}

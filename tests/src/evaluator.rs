#[cfg(test)]
mod tests {
    use approx::{assert_abs_diff_eq, assert_relative_eq};
    use std::f64::consts::PI;

    use lumen::{
        lights::{Emitter, EmitterSample},
        math::{Point3, Spectrum},
        path::{Path, PathEvaluator, PathVertex, Role, Side},
    };

    use crate::scenes::{self, CENTER, FLOOR_ALBEDO, LIGHT_RADIANCE};

    #[test]
    fn point_light_on_diffuse_floor() {
        let intensity = 3.0;
        let light_pos = Point3::new(1.0, 0.0, 2.0);
        let scene = scenes::point_lit_floor(light_pos, Spectrum::splat(intensity));
        let tracer = scenes::tracer(&scene);
        let (ctx, mut rng) = tracer.context(0, 0);

        let eye = tracer.trace_eye(CENTER, &ctx).unwrap();
        let floor = scenes::extend_toward(&tracer, &eye, Point3::zeros());
        assert_abs_diff_eq!(floor.point().unwrap(), Point3::zeros(), epsilon = 1e-12);
        let light = tracer.trace_light(&ctx, &mut rng).unwrap().unwrap();

        let path = Path::join(light.clone(), floor.clone()).unwrap();
        assert_eq!(path.light_length(), 1);
        assert_eq!(path.eye_length(), 2);

        // I / r^2 * albedo / pi * cos
        let r_sqr = light_pos.dist_sqr(Point3::zeros());
        let cos = 2.0 / r_sqr.sqrt();
        let expected = Spectrum::splat(intensity / r_sqr * (FLOOR_ALBEDO / PI) * cos);

        let evaluator = PathEvaluator::new();
        assert_abs_diff_eq!(evaluator.contribution(&path).unwrap(), expected, epsilon = 1e-9);
        // The point light can't be hit so connecting is the only strategy
        assert_abs_diff_eq!(evaluator.mis_weight(&path).unwrap(), 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(evaluator.combine(&path).unwrap(), expected, epsilon = 1e-9);
        assert_abs_diff_eq!(
            evaluator.estimate_pixel(Some(&light), &floor).unwrap(),
            expected,
            epsilon = 1e-9
        );
    }

    #[test]
    fn strategies_agree_on_shared_path() {
        let scene = scenes::two_bounce();
        let tracer = scenes::tracer(&scene);
        let (ctx, mut rng) = tracer.context(0, 0);
        let panel = Point3::new(1.5, 0.0, 2.0);

        let eye = tracer.trace_eye(CENTER, &ctx).unwrap();
        let floor = scenes::extend_toward(&tracer, &eye, Point3::zeros());
        let panel_from_eye = scenes::extend_toward(&tracer, &floor, panel);
        let light = tracer.trace_light(&ctx, &mut rng).unwrap().unwrap();
        let panel_from_light = scenes::extend_toward(&tracer, &light, panel);
        assert_abs_diff_eq!(panel_from_eye.point().unwrap(), panel, epsilon = 1e-9);
        assert_abs_diff_eq!(panel_from_light.point().unwrap(), panel, epsilon = 1e-9);

        // The same physical path, split after one and after two light vertices
        let one = Path::join(light, panel_from_eye).unwrap();
        let two = Path::join(panel_from_light, floor).unwrap();
        assert_eq!(one.total_vertex_count(), 4);
        assert_eq!(two.total_vertex_count(), 4);

        let evaluator = PathEvaluator::new();
        let w1 = evaluator.mis_weight(&one).unwrap();
        let w2 = evaluator.mis_weight(&two).unwrap();
        assert!(w1 > 0.0 && w2 > 0.0);
        assert_abs_diff_eq!(w1 + w2, 1.0, epsilon = 1e-12);

        let c1 = evaluator.combine(&one).unwrap();
        let c2 = evaluator.combine(&two).unwrap();
        assert!(!c1.is_black());
        assert_relative_eq!(c1, c2, max_relative = 1e-9);

        // Unweighted estimates only agree after weighting
        assert!(
            (evaluator.contribution(&one).unwrap().r - evaluator.contribution(&two).unwrap().r)
                .abs()
                > 1e-3
        );
        assert!(evaluator.strategy_density(&one).unwrap() > 0.0);
        assert!(evaluator.strategy_density(&two).unwrap() > 0.0);
    }

    #[test]
    fn emission_and_connection_weights_sum_to_one() {
        let scene = scenes::area_lit_floor();
        let tracer = scenes::tracer(&scene);
        let (ctx, _) = tracer.context(0, 0);

        let eye = tracer.trace_eye(CENTER, &ctx).unwrap();
        let floor = scenes::extend_toward(&tracer, &eye, Point3::zeros());
        let on_light = scenes::extend_toward(&tracer, &floor, Point3::new(0.2, 0.1, 2.0));
        assert!(on_light.is_on_light_source());
        assert_eq!(on_light.side(), Side::Eye);

        let evaluator = PathEvaluator::new();
        let emission = evaluator.emission(&on_light).unwrap();
        let unweighted = on_light.weight() * on_light.source_radiance();
        assert_abs_diff_eq!(
            unweighted,
            Spectrum::splat(FLOOR_ALBEDO * LIGHT_RADIANCE),
            epsilon = 1e-9
        );
        let w0 = emission.r / unweighted.r;

        // Start a light subpath on the same emitter point
        let hit = match on_light.role() {
            Role::Surface { hit, .. } => hit.clone(),
            _ => panic!("Expected a surface vertex"),
        };
        let sample = EmitterSample {
            power: hit.material.emission(&hit, hit.n, ctx.wavelengths()),
            pdf: scene.light.emitter_pdf(&hit),
            emitter: Emitter::Surface { hit },
        };
        let light = PathVertex::light_terminal(sample, &ctx).unwrap().unwrap();
        let connected = Path::join(light, floor).unwrap();
        let w1 = evaluator.mis_weight(&connected).unwrap();

        assert!(w0 > 0.0 && w1 > 0.0);
        assert_abs_diff_eq!(w0 + w1, 1.0, epsilon = 1e-9);
        assert_relative_eq!(
            evaluator.combine(&connected).unwrap(),
            emission,
            max_relative = 1e-9
        );
    }

    #[test]
    fn background_seen_by_eye() {
        let background = Spectrum::new(0.25, 0.5, 1.0);
        let scene = scenes::empty(background);
        let tracer = scenes::tracer(&scene);
        let (ctx, mut rng) = tracer.context(0, 0);

        let eye = tracer.sample_eye(CENTER, &ctx, &mut rng).unwrap().unwrap();
        assert!(matches!(eye.role(), Role::Background { .. }));
        assert_eq!(eye.depth(), 1);
        assert!(eye.point().is_none());

        let evaluator = PathEvaluator::new();
        assert_abs_diff_eq!(evaluator.emission(&eye).unwrap(), background, epsilon = 1e-12);

        // Points at infinity can't be connected to
        let light = tracer.sample_light(&ctx, &mut rng).unwrap().unwrap();
        let path = Path::join(light.clone(), eye.clone()).unwrap();
        assert!(evaluator.contribution(&path).unwrap().is_black());
        assert_abs_diff_eq!(
            evaluator.estimate_pixel(Some(&light), &eye).unwrap(),
            background,
            epsilon = 1e-12
        );
    }

    #[test]
    fn short_eye_subpaths_are_not_strategies() {
        let scene = scenes::point_lit_floor(Point3::new(0.0, 0.0, 1.0), Spectrum::ones());
        let tracer = scenes::tracer(&scene);
        let (ctx, mut rng) = tracer.context(0, 0);

        let eye = tracer.trace_eye(CENTER, &ctx).unwrap();
        let light = tracer.sample_light(&ctx, &mut rng).unwrap().unwrap();
        let path = Path::join(light, eye).unwrap();
        assert_eq!(path.eye_length(), 1);

        let evaluator = PathEvaluator::new();
        assert!(evaluator.contribution(&path).unwrap().is_black());
        assert_eq!(evaluator.mis_weight(&path).unwrap(), 0.0);
        assert!(evaluator.combine(&path).unwrap().is_black());
    }

    #[test]
    fn incomplete_paths_have_no_weight() {
        let scene = scenes::two_bounce();
        let tracer = scenes::tracer(&scene);
        let (ctx, mut rng) = tracer.context(0, 0);

        let eye = tracer.trace_eye(CENTER, &ctx).unwrap();
        let floor = scenes::extend_toward(&tracer, &eye, Point3::zeros());
        let light = tracer.trace_light(&ctx, &mut rng).unwrap().unwrap();
        let panel = scenes::extend_toward(&tracer, &light, Point3::new(1.5, 0.0, 2.0));
        let path = Path::join(panel, floor).unwrap();

        let sliced = path.slice(1, 4).unwrap();
        assert!(!sliced.is_complete());
        let evaluator = PathEvaluator::new();
        assert_eq!(evaluator.mis_weight(&sliced).unwrap(), 0.0);
        assert_eq!(evaluator.strategy_density(&sliced).unwrap(), 0.0);
    }

    #[test]
    fn specular_endpoint_can_not_connect() {
        let scene = scenes::mirror_floor();
        let tracer = scenes::tracer(&scene);
        let (ctx, mut rng) = tracer.context(0, 0);

        let eye = tracer.trace_eye(CENTER, &ctx).unwrap();
        let mirror = {
            let d = eye.sample_position(&mut rng).unwrap().unwrap();
            let ray = eye.spawn_ray(d.direction).unwrap();
            tracer.extend(&ray, eye.weight() * d.weight, &eye).unwrap()
        };
        assert!(mirror.is_specular());

        let light = tracer.trace_light(&ctx, &mut rng).unwrap().unwrap();
        let path = Path::join(light, mirror).unwrap();
        let evaluator = PathEvaluator::new();
        assert!(evaluator.contribution(&path).unwrap().is_black());
        assert_eq!(evaluator.mis_weight(&path).unwrap(), 0.0);
    }

    #[test]
    fn sampled_mirror_lobe_blocks_connection() {
        let scene = scenes::half_mirror_floor();
        let tracer = scenes::tracer(&scene);
        let (ctx, mut rng) = tracer.context(0, 0);
        let (floor, wall) = scenes::mirror_bounce(&tracer);
        let light = tracer.trace_light(&ctx, &mut rng).unwrap().unwrap();

        let path = Path::join(light, wall).unwrap();
        let evaluator = PathEvaluator::new();
        let c = evaluator.contribution(&path).unwrap();
        assert!(!c.is_black());

        // Connecting to the floor would need the density of a delta lobe, so
        // the light connection at the wall is the only strategy left
        assert!(!floor.is_specular());
        assert_eq!(evaluator.mis_weight(&path).unwrap(), 1.0);
        assert_abs_diff_eq!(evaluator.combine(&path).unwrap(), c, epsilon = 1e-12);
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use std::sync::Arc;

    use lumen::{
        color::ColorModel,
        math::{Point2, Point3, Spectrum},
        path::{Path, PathMutator, Proposal, Side, SubpathTracer, SuffixMutator},
        sampling::create_random,
        scene::Scene,
    };

    use crate::scenes::{self, CENTER};

    fn floor_path() -> (SubpathTracer, Path) {
        let scene = scenes::point_lit_floor(Point3::new(1.0, 0.0, 2.0), Spectrum::ones());
        let tracer = scenes::tracer(&scene);
        let (ctx, mut rng) = tracer.context(0, 0);
        let eye = tracer.trace_eye(CENTER, &ctx).unwrap();
        let floor = scenes::extend_toward(&tracer, &eye, Point3::zeros());
        let light = tracer.trace_light(&ctx, &mut rng).unwrap().unwrap();
        (tracer, Path::join(light, floor).unwrap())
    }

    #[test]
    fn lone_light_terminal_is_kept() {
        let (tracer, path) = floor_path();
        assert_eq!(path.light_length(), 1);

        let mutator = SuffixMutator::new(tracer, Side::Light, 1);
        let mut rng = create_random(0, 1);
        for _ in 0..8 {
            let proposal = mutator.propose(&path, &mut rng).unwrap();
            assert!(proposal.candidate.is_none());
            assert_eq!(proposal.acceptance(1.0, 1.0), 0.0);
        }
    }

    #[test]
    fn regrown_eye_vertex() {
        let (tracer, path) = floor_path();
        let mutator = SuffixMutator::new(tracer, Side::Eye, 1);
        let mut rng = create_random(0, 1);

        let proposal = mutator.propose(&path, &mut rng).unwrap();
        let candidate = proposal.candidate.as_ref().unwrap();
        assert_eq!(candidate.eye_length(), 2);
        assert!(Arc::ptr_eq(candidate.light_tail(), path.light_tail()));
        assert!(!Arc::ptr_eq(candidate.eye_tail(), path.eye_tail()));
        assert!(Arc::ptr_eq(
            candidate.eye_tail().parent().unwrap(),
            path.eye_tail().parent().unwrap()
        ));

        assert!(proposal.forward_density > 0.0);
        assert!(proposal.reverse_density > 0.0);
        assert_relative_eq!(
            mutator.transition_density(&path, candidate).unwrap(),
            proposal.forward_density,
            max_relative = 1e-12
        );

        // Paths that don't share the eye terminal can't be reached
        let unrelated = floor_path().1;
        assert_eq!(mutator.transition_density(&path, &unrelated).unwrap(), 0.0);
    }

    #[test]
    fn proposals_keep_the_other_side() {
        let scene = Arc::new(Scene::cornell_box((8, 8)).unwrap());
        let tracer = SubpathTracer::new(scene, ColorModel::Rgb, 6);
        let mutators = [
            SuffixMutator::new(tracer.clone(), Side::Light, 2),
            SuffixMutator::new(tracer.clone(), Side::Eye, 2),
        ];

        let mut proposed = 0;
        for stream in 0..64 {
            let (ctx, mut rng) = tracer.context(3, stream);
            let pixel = Point2::new(4.0, 4.0);
            let eye = tracer.sample_eye(pixel, &ctx, &mut rng).unwrap().unwrap();
            let light = tracer.sample_light(&ctx, &mut rng).unwrap().unwrap();
            let path = Path::join(light, eye).unwrap();

            for mutator in &mutators {
                let proposal = mutator.propose(&path, &mut rng).unwrap();
                let candidate = match &proposal.candidate {
                    Some(c) => c,
                    None => continue,
                };
                proposed += 1;

                let other = mutator.side().opposite();
                assert!(Arc::ptr_eq(
                    candidate.side_tail(other),
                    path.side_tail(other)
                ));
                assert_eq!(candidate.side_length(other), path.side_length(other));
                assert_eq!(candidate.eye_tail().pixel(), Some(pixel));
                assert!(candidate.is_complete());

                assert!(proposal.forward_density > 0.0);
                assert!(proposal.reverse_density >= 0.0);
                assert_relative_eq!(
                    mutator.transition_density(&path, candidate).unwrap(),
                    proposal.forward_density,
                    max_relative = 1e-12
                );
                let a = proposal.acceptance(1.0, 1.0);
                assert!((0.0..=1.0).contains(&a));
            }
        }
        assert!(proposed > 0);
    }

    #[test]
    fn acceptance() {
        let (_, path) = floor_path();
        let proposal = Proposal {
            candidate: Some(path),
            forward_density: 2.0,
            reverse_density: 1.0,
        };
        assert_relative_eq!(proposal.acceptance(1.0, 1.0), 0.5);
        assert_relative_eq!(proposal.acceptance(1.0, 4.0), 1.0);
        assert_eq!(proposal.acceptance(1.0, 0.0), 0.0);
        assert_eq!(proposal.acceptance(0.0, 1.0), 1.0);
        assert_eq!(Proposal::rejected().acceptance(1.0, 1.0), 0.0);
    }
}

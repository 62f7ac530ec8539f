#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use lumen::{
        math::Point3,
        path::{Path, Role, Side},
        Error,
    };

    use crate::scenes::{self, CENTER};

    /// Light subpath of two vertices joined to an eye subpath of three.
    fn five_vertex_path() -> Path {
        let scene = scenes::two_bounce();
        let tracer = scenes::tracer(&scene);
        let (ctx, mut rng) = tracer.context(0, 0);
        let panel = Point3::new(1.5, 0.0, 2.0);

        let eye = tracer.trace_eye(CENTER, &ctx).unwrap();
        let floor = scenes::extend_toward(&tracer, &eye, Point3::zeros());
        let eye_panel = scenes::extend_toward(&tracer, &floor, panel);
        let light = tracer.trace_light(&ctx, &mut rng).unwrap().unwrap();
        let light_panel = scenes::extend_toward(&tracer, &light, panel);
        Path::join(light_panel, eye_panel).unwrap()
    }

    #[test]
    fn join() {
        let path = five_vertex_path();
        assert_eq!(path.light_length(), 2);
        assert_eq!(path.eye_length(), 3);
        assert_eq!(path.total_vertex_count(), 5);
        assert!(path.is_complete());

        let vertices = path.vertices();
        assert_eq!(vertices.len(), path.total_vertex_count());
        assert!(matches!(vertices[0].role(), Role::LightTerminal { .. }));
        assert!(matches!(vertices[4].role(), Role::EyeTerminal { .. }));
        for v in &vertices[..2] {
            assert_eq!(v.side(), Side::Light);
        }
        for v in &vertices[2..] {
            assert_eq!(v.side(), Side::Eye);
        }
        assert!(Arc::ptr_eq(&vertices[1], path.light_tail()));
        assert!(Arc::ptr_eq(&vertices[2], path.eye_tail()));
    }

    #[test]
    fn slice_shares_vertices() {
        let path = five_vertex_path();
        let vertices = path.vertices();

        let sliced = path.slice(1, 4).unwrap();
        assert_eq!(sliced.light_length(), 1);
        assert_eq!(sliced.eye_length(), 2);
        assert!(!sliced.is_complete());
        let inner = sliced.vertices();
        assert_eq!(inner.len(), 3);
        for (a, b) in inner.iter().zip(&vertices[1..4]) {
            assert!(Arc::ptr_eq(a, b));
        }

        let whole = path.slice(0, 5).unwrap();
        assert!(whole.is_complete());
        assert_eq!(whole.total_vertex_count(), 5);
    }

    #[test]
    fn invalid_slices() {
        let path = five_vertex_path();
        for (from, to) in [(2, 5), (0, 2), (1, 6), (3, 4), (4, 2)] {
            assert!(matches!(
                path.slice(from, to),
                Err(Error::InvalidSlice { len: 5, .. })
            ));
        }
    }

    #[test]
    fn join_needs_a_light_and_an_eye_side() {
        let path = five_vertex_path();
        let (light, eye) = (path.light_tail().clone(), path.eye_tail().clone());

        assert!(matches!(
            Path::join(eye.clone(), eye.clone()),
            Err(Error::InvalidJoin {
                light: Side::Eye,
                eye: Side::Eye
            })
        ));
        assert!(matches!(
            Path::join(light.clone(), light.clone()),
            Err(Error::InvalidJoin {
                light: Side::Light,
                eye: Side::Light
            })
        ));
        assert!(matches!(
            Path::join(eye, light),
            Err(Error::InvalidJoin { .. })
        ));
    }

    #[test]
    fn truncate() {
        let path = five_vertex_path();

        let shorter = path.truncate_eye(1).unwrap();
        assert_eq!(shorter.eye_length(), 2);
        assert_eq!(shorter.light_length(), 2);
        assert!(shorter.is_complete());
        assert!(Arc::ptr_eq(
            shorter.eye_tail(),
            path.eye_tail().parent().unwrap()
        ));
        assert!(Arc::ptr_eq(shorter.light_tail(), path.light_tail()));

        let shorter = path.truncate_light(1).unwrap();
        assert_eq!(shorter.light_length(), 1);
        assert!(matches!(
            shorter.light_tail().role(),
            Role::LightTerminal { .. }
        ));

        assert!(matches!(
            path.truncate_light(2),
            Err(Error::InvalidTruncation {
                removed: 2,
                length: 2
            })
        ));
        assert!(matches!(
            path.truncate_eye(3),
            Err(Error::InvalidTruncation {
                removed: 3,
                length: 3
            })
        ));
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use crate::*;

    fn update(stage: &mut Stage, backend: &mut RecordingBackend, screen: Size) {
        stage
            .update(backend, &InputState::new(), screen)
            .expect("update");
    }

    fn blends(calls: &[DrawCall]) -> Vec<(Point, BlendMode, u8)> {
        calls
            .iter()
            .filter_map(|c| match c {
                DrawCall::Blend { at, mode, alpha, .. } => Some((*at, *mode, *alpha)),
                _ => None,
            })
            .collect()
    }

    /// Paints a marker so tests can see where widget content lands.
    struct Marker {
        node: ViewNode,
        color: Color,
    }

    impl Updatable for Marker {
        fn update(&mut self, cx: &mut UpdateContext<'_>) -> Result<()> {
            self.node.update(cx)
        }
    }

    impl Drawable for Marker {
        fn draw_content(&mut self, backend: &mut dyn RenderBackend) -> Result<()> {
            backend.fill_rect(Rect::new(1, 1, 2, 2), self.color);
            Ok(())
        }
    }

    impl Widget for Marker {
        fn node(&self) -> &ViewNode {
            &self.node
        }
        fn node_mut(&mut self) -> &mut ViewNode {
            &mut self.node
        }
    }

    /// Remembers what each update saw of its own on-screen bounds.
    struct BoundsLog {
        node: ViewNode,
        seen: Rc<RefCell<Vec<Option<Rect>>>>,
    }

    impl BoundsLog {
        fn at(x: i32, y: i32, size: Size) -> (Self, Rc<RefCell<Vec<Option<Rect>>>>) {
            let seen = Rc::new(RefCell::new(Vec::new()));
            let mut node = ViewNode::new(size.width, size.height);
            node.x = x;
            node.y = y;
            (Self { node, seen: seen.clone() }, seen)
        }
    }

    impl Updatable for BoundsLog {
        fn update(&mut self, cx: &mut UpdateContext<'_>) -> Result<()> {
            self.seen.borrow_mut().push(cx.visible_bounds(&self.node));
            self.node.update(cx)
        }
    }

    impl Drawable for BoundsLog {}

    impl Widget for BoundsLog {
        fn node(&self) -> &ViewNode {
            &self.node
        }
        fn node_mut(&mut self) -> &mut ViewNode {
            &mut self.node
        }
    }

    #[test]
    fn visible_bounds_are_clipped_by_ancestors_and_screen() {
        let mut backend = RecordingBackend::new();
        let (inner, seen_inner) = BoundsLog::at(80, -10, Size::new(40, 40));
        let (outer, seen_outer) = BoundsLog::at(20, 20, Size::new(100, 100));
        let outer = BoundsLog {
            node: outer.node.with_child(inner),
            seen: outer.seen,
        };
        let mut stage = Stage::new(ViewNode::new(200, 200).with_child(outer));

        update(&mut stage, &mut backend, Size::new(110, 300));
        // Outer is cut by the screen's right edge; inner by outer's target.
        assert_eq!(seen_outer.borrow()[0], Some(Rect::new(20, 20, 90, 100)));
        assert_eq!(seen_inner.borrow()[0], Some(Rect::new(100, 20, 10, 30)));

        stage.root_mut().node_mut().children_mut()[0].node_mut().x = 200;
        update(&mut stage, &mut backend, Size::new(110, 300));
        assert_eq!(seen_outer.borrow()[1], None);
        assert_eq!(seen_inner.borrow()[1], None);
        stage.release(&mut backend);
    }

    #[test]
    fn hidden_or_grouped_nodes_have_no_visible_bounds() {
        let mut backend = RecordingBackend::new();
        let (in_group, seen_in_group) = BoundsLog::at(0, 0, Size::new(10, 10));
        let (in_hidden, seen_in_hidden) = BoundsLog::at(0, 0, Size::new(10, 10));
        let (mut hidden, seen_hidden) = BoundsLog::at(0, 0, Size::new(10, 10));
        hidden.node.visible = false;
        let mut hidden_parent = ViewNode::new(30, 30).with_child(in_hidden);
        hidden_parent.visible = false;

        let root = ViewNode::new(100, 100)
            .with_child(ViewNode::group(30, 30).with_child(in_group))
            .with_child(hidden_parent)
            .with_child(hidden);
        let mut stage = Stage::new(root);
        update(&mut stage, &mut backend, Size::new(100, 100));

        assert_eq!(*seen_in_group.borrow(), vec![None]);
        assert_eq!(*seen_in_hidden.borrow(), vec![None]);
        assert_eq!(*seen_hidden.borrow(), vec![None]);
        stage.release(&mut backend);
    }

    #[test]
    fn target_allocated_once_for_unchanged_size() {
        let mut backend = RecordingBackend::new();
        let mut stage = Stage::new(ViewNode::new(100, 100));

        for _ in 0..5 {
            update(&mut stage, &mut backend, Size::new(800, 600));
        }
        assert_eq!(backend.created(), 1);
        assert_eq!(backend.destroyed(), 0);

        stage.release(&mut backend);
        assert_eq!(backend.live_targets(), 0);
    }

    #[test]
    fn resize_reallocates_exactly_once() {
        let mut backend = RecordingBackend::new();
        let mut stage = Stage::new(ViewNode::new(100, 100));
        update(&mut stage, &mut backend, Size::new(800, 600));
        backend.take_calls();

        stage.root_mut().node_mut().set_size(Size::new(150, 120));
        update(&mut stage, &mut backend, Size::new(800, 600));
        let calls = backend.take_calls();
        let destroys = calls.iter().filter(|c| matches!(c, DrawCall::Destroy(_))).count();
        let creates: Vec<Size> = calls
            .iter()
            .filter_map(|c| match c {
                DrawCall::Create { size, .. } => Some(*size),
                _ => None,
            })
            .collect();
        assert_eq!(destroys, 1);
        assert_eq!(creates, vec![Size::new(150, 120)]);

        update(&mut stage, &mut backend, Size::new(800, 600));
        update(&mut stage, &mut backend, Size::new(800, 600));
        assert!(backend.take_calls().is_empty());

        let target = stage.root().node().target().expect("allocated");
        assert_eq!(backend.target_size(target), Some(Size::new(150, 120)));
        stage.release(&mut backend);
    }

    #[test]
    fn empty_size_allocates_nothing_and_draws_nothing() {
        let mut backend = RecordingBackend::new();
        let mut stage = Stage::new(ViewNode::new(0, 40));
        update(&mut stage, &mut backend, Size::new(800, 600));
        stage.draw(&mut backend).expect("draw");
        assert!(backend.calls().is_empty());

        // Shrinking to nothing drops an existing target.
        let mut stage = Stage::new(ViewNode::new(10, 10));
        update(&mut stage, &mut backend, Size::new(800, 600));
        stage.root_mut().node_mut().set_size(Size::new(10, -3));
        update(&mut stage, &mut backend, Size::new(800, 600));
        assert_eq!(backend.live_targets(), 0);
        assert_eq!(stage.root().node().target(), None);
        stage.draw(&mut backend).expect("draw");
    }

    #[test]
    fn draw_order_background_content_children_then_blend() {
        let mut backend = RecordingBackend::new();
        let child = Marker {
            node: ViewNode::new(20, 20).with_corner_radius(0.0),
            color: Color::PINK,
        };
        let root = Control::new(100, 50)
            .aligned(HorizontalAlignment::Left, VerticalAlignment::Top)
            .offset(5, 6)
            .with_child(child);
        let mut stage = Stage::new(root);
        update(&mut stage, &mut backend, Size::new(640, 480));
        backend.take_calls();

        stage.draw(&mut backend).expect("draw");
        let root_target = stage.root().node().target().expect("root target");
        let child_target = stage.root().node().children()[0]
            .node()
            .target()
            .expect("child target");
        let root_t = DrawTarget::Offscreen(root_target);
        let child_t = DrawTarget::Offscreen(child_target);

        let expected = vec![
            DrawCall::SetTarget(root_t),
            DrawCall::Clear(root_t),
            DrawCall::SetBlendMode(BlendMode::PremultipliedAlpha, 255),
            DrawCall::FillRoundedRect {
                on: root_t,
                rect: Rect::new(0, 0, 100, 50),
                radius: 8.0,
                color: Color::WHITE,
            },
            DrawCall::SetBlendMode(BlendMode::NoBlend, 255),
            DrawCall::SetTarget(child_t),
            DrawCall::Clear(child_t),
            DrawCall::SetBlendMode(BlendMode::PremultipliedAlpha, 255),
            DrawCall::FillRect {
                on: child_t,
                rect: Rect::new(0, 0, 20, 20),
                color: Color::WHITE,
            },
            DrawCall::SetBlendMode(BlendMode::NoBlend, 255),
            DrawCall::FillRect {
                on: child_t,
                rect: Rect::new(1, 1, 2, 2),
                color: Color::PINK,
            },
            DrawCall::SetTarget(root_t),
            DrawCall::Blend {
                source: child_target,
                onto: root_t,
                at: Point::new(0, 0),
                mode: BlendMode::PremultipliedAlpha,
                alpha: 255,
            },
            DrawCall::SetTarget(DrawTarget::Screen),
            DrawCall::Blend {
                source: root_target,
                onto: DrawTarget::Screen,
                at: Point::new(5, 6),
                mode: BlendMode::Alpha,
                alpha: 255,
            },
        ];
        assert_eq!(backend.calls(), expected.as_slice());
        assert_eq!(backend.active_target(), DrawTarget::Screen);
        stage.release(&mut backend);
    }

    #[test]
    fn children_compose_in_insertion_order() {
        let mut backend = RecordingBackend::new();
        let mut root = ViewNode::new(100, 100);
        for i in 0..3 {
            let mut child = ViewNode::new(10, 10);
            child.x = i * 10;
            root.add_child(Box::new(child));
        }
        let mut stage = Stage::new(root);
        update(&mut stage, &mut backend, Size::new(100, 100));
        backend.take_calls();
        stage.draw(&mut backend).expect("draw");

        let xs: Vec<i32> = blends(backend.calls()).iter().map(|(p, _, _)| p.x).collect();
        // Three children, then the root itself onto the screen.
        assert_eq!(xs, vec![0, 10, 20, 0]);
        stage.release(&mut backend);
    }

    #[test]
    fn child_buffer_finished_before_blend() {
        let mut backend = RecordingBackend::new();
        let root = ViewNode::new(50, 50).with_child(ViewNode::new(10, 10).with_child(ViewNode::new(5, 5)));
        let mut stage = Stage::new(root);
        update(&mut stage, &mut backend, Size::new(50, 50));
        backend.take_calls();
        stage.draw(&mut backend).expect("draw");

        // Every blend of a source happens after the last draw call on it.
        let calls = backend.calls();
        for (i, call) in calls.iter().enumerate() {
            if let DrawCall::Blend { source, .. } = call {
                let src = DrawTarget::Offscreen(*source);
                let drawn_after = calls[i..].iter().any(|c| match c {
                    DrawCall::FillRect { on, .. } | DrawCall::FillRoundedRect { on, .. } => *on == src,
                    DrawCall::Clear(on) => *on == src,
                    _ => false,
                });
                assert!(!drawn_after, "{source:?} drawn after being blended");
            }
        }
        stage.release(&mut backend);
    }

    #[test]
    fn invisible_node_renders_but_is_not_blended() {
        let mut backend = RecordingBackend::new();
        let mut hidden = ViewNode::new(10, 10);
        hidden.visible = false;
        let mut stage = Stage::new(ViewNode::new(40, 40).with_child(hidden));
        update(&mut stage, &mut backend, Size::new(40, 40));
        backend.take_calls();
        stage.draw(&mut backend).expect("draw");

        let child_target = stage.root().node().children()[0]
            .node()
            .target()
            .expect("child target");
        assert!(backend
            .calls()
            .contains(&DrawCall::Clear(DrawTarget::Offscreen(child_target))));
        assert_eq!(blends(backend.calls()).len(), 1);
        stage.release(&mut backend);
    }

    #[test]
    fn groups_are_updated_but_never_composed() {
        let mut backend = RecordingBackend::new();
        let group = ViewNode::group(30, 30).with_child(ViewNode::new(10, 10));
        let mut stage = Stage::new(ViewNode::new(60, 60).with_child(group));
        update(&mut stage, &mut backend, Size::new(60, 60));
        // Only the root allocates: nothing under a group is ever blended.
        assert_eq!(backend.live_targets(), 1);
        let group = stage.root().node().children()[0].node();
        assert_eq!(group.target(), None);
        assert_eq!(group.children()[0].node().target(), None);
        assert_eq!(group.children()[0].node().allocated_size(), Some(Size::new(10, 10)));
        backend.take_calls();

        stage.draw(&mut backend).expect("draw");
        assert_eq!(blends(backend.calls()).len(), 1);
        stage.release(&mut backend);
        assert_eq!(backend.live_targets(), 0);
    }

    #[test]
    fn nodes_moved_out_of_a_group_allocate() {
        let mut backend = RecordingBackend::new();
        let group = ViewNode::group(30, 30).with_child(ViewNode::new(10, 10));
        let mut stage = Stage::new(ViewNode::new(60, 60).with_child(group));
        update(&mut stage, &mut backend, Size::new(60, 60));
        assert_eq!(backend.live_targets(), 1);

        let root = stage.root_mut().node_mut();
        root.children_mut()[0]
            .node_mut()
            .remove_child(0, &mut backend);
        root.add_child(Box::new(ViewNode::new(10, 10)));
        update(&mut stage, &mut backend, Size::new(60, 60));
        assert_eq!(backend.live_targets(), 2);
        stage.release(&mut backend);
    }

    #[test]
    fn background_skipped_without_alpha_or_color() {
        let mut backend = RecordingBackend::new();
        let mut stage = Stage::new(
            ViewNode::new(10, 10)
                .with_background(Some(Color::BLACK), 0)
                .with_child(ViewNode::new(5, 5).with_background(None, 255)),
        );
        update(&mut stage, &mut backend, Size::new(10, 10));
        backend.take_calls();
        stage.draw(&mut backend).expect("draw");
        assert!(!backend.calls().iter().any(|c| matches!(
            c,
            DrawCall::FillRect { .. } | DrawCall::FillRoundedRect { .. }
        )));
        stage.release(&mut backend);
    }

    #[test]
    fn alpha_setters_clamp() {
        let mut node = ViewNode::new(1, 1);
        node.set_alpha_clamped(400);
        node.set_background_alpha_clamped(-20);
        assert_eq!(node.alpha, 255);
        assert_eq!(node.background_alpha, 0);
    }

    #[test]
    fn observers_run_with_own_target_active() {
        let mut backend = RecordingBackend::new();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut root = ViewNode::new(20, 20);
        {
            let seen = seen.clone();
            root.on_rendering(move |backend: &mut dyn RenderBackend| {
                let previous = backend.set_active_target(DrawTarget::Screen);
                backend.set_active_target(previous);
                seen.borrow_mut().push(previous);
            });
        }
        let mut stage = Stage::new(root);
        update(&mut stage, &mut backend, Size::new(20, 20));
        stage.draw(&mut backend).expect("draw");

        let target = stage.root().node().target().expect("target");
        assert_eq!(*seen.borrow(), vec![DrawTarget::Offscreen(target)]);
        stage.release(&mut backend);
    }

    #[test]
    fn allocation_failure_propagates_and_retries() {
        let mut backend = RecordingBackend::new();
        let mut stage = Stage::new(ViewNode::new(10, 10).with_child(ViewNode::new(4, 4)));
        backend.set_fail_creation(true);
        let err = stage
            .update(&mut backend, &InputState::new(), Size::new(10, 10))
            .expect_err("creation fails");
        assert!(matches!(err, ViewError::Backend(BackendError::TargetCreation { .. })));
        assert_eq!(stage.root().node().allocated_size(), None);

        backend.set_fail_creation(false);
        update(&mut stage, &mut backend, Size::new(10, 10));
        assert_eq!(backend.live_targets(), 2);
        stage.release(&mut backend);
    }

    #[test]
    fn removing_a_child_releases_its_subtree() {
        let mut backend = RecordingBackend::new();
        let mut stage = Stage::new(
            ViewNode::new(10, 10).with_child(ViewNode::new(4, 4).with_child(ViewNode::new(2, 2))),
        );
        update(&mut stage, &mut backend, Size::new(10, 10));
        assert_eq!(backend.live_targets(), 3);

        assert!(stage.root_mut().node_mut().remove_child(0, &mut backend));
        assert!(!stage.root_mut().node_mut().remove_child(0, &mut backend));
        assert_eq!(backend.live_targets(), 1);
        stage.release(&mut backend);
    }

    #[test]
    fn release_tears_down_children_before_parent() {
        let mut backend = RecordingBackend::new();
        let mut stage = Stage::new(ViewNode::new(10, 10).with_child(ViewNode::new(4, 4)));
        update(&mut stage, &mut backend, Size::new(10, 10));
        let root = stage.root().node().target().expect("root");
        let child = stage.root().node().children()[0].node().target().expect("child");
        backend.take_calls();

        stage.release(&mut backend);
        assert_eq!(
            backend.calls(),
            &[DrawCall::Destroy(child), DrawCall::Destroy(root)]
        );
    }

    #[test]
    fn nested_control_aligns_in_parent_regardless_of_screen() {
        for screen in [Size::new(100, 50), Size::new(1920, 1080)] {
            let mut backend = RecordingBackend::new();
            let root = Control::new(100, 50).with_child(
                Control::new(20, 20)
                    .aligned(HorizontalAlignment::Left, VerticalAlignment::Top)
                    .offset(10, 10),
            );
            let mut stage = Stage::new(root);
            update(&mut stage, &mut backend, screen);
            assert_eq!(
                stage.root().node().children()[0].node().position(),
                Point::new(10, 10)
            );
            stage.release(&mut backend);
        }
    }

    #[test]
    fn control_realigns_when_parent_resizes() {
        let mut backend = RecordingBackend::new();
        let mut stage = Stage::new(Control::new(100, 100));
        update(&mut stage, &mut backend, Size::new(300, 300));
        assert_eq!(stage.root().node().position(), Point::new(100, 100));
        update(&mut stage, &mut backend, Size::new(500, 200));
        assert_eq!(stage.root().node().position(), Point::new(200, 50));
        stage.release(&mut backend);
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "parent size")]
    fn control_without_parent_size_fails_loudly() {
        let mut backend = RecordingBackend::new();
        let input = InputState::new();
        let mut control = Control::new(10, 10);
        let mut cx = UpdateContext::new(&mut backend, &input);
        let _ = control.update(&mut cx);
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "update before drawing")]
    fn drawing_before_update_fails_loudly() {
        let mut backend = RecordingBackend::new();
        let mut stage = Stage::new(ViewNode::new(10, 10));
        let _ = stage.draw(&mut backend);
    }

    #[test]
    #[cfg(not(debug_assertions))]
    fn tree_consistency_errors_surface_in_release() {
        let mut backend = RecordingBackend::new();
        let mut stage = Stage::new(ViewNode::new(10, 10));
        assert!(matches!(
            stage.draw(&mut backend),
            Err(ViewError::StaleTarget { .. })
        ));

        let input = InputState::new();
        let mut control = Control::new(10, 10);
        let mut cx = UpdateContext::new(&mut backend, &input);
        assert!(matches!(
            control.update(&mut cx),
            Err(ViewError::MissingParentSize)
        ));
        control.node.release(&mut backend);
    }

    #[test]
    fn color_hex_round_trip() {
        let c = Color::from_hex("#FF5733");
        assert_eq!(c, Color(255, 87, 51));
        assert_eq!(c.to_hex(), "#FF5733");
        assert_eq!(c.to_packed(), 0x00FF_5733);
        assert_eq!(Color::from_hex("nope"), Color::BLACK);
    }

    #[test]
    fn rect_intersection() {
        let a = Rect::new(0, 0, 100, 50);
        assert_eq!(a.intersect(Rect::new(50, -10, 100, 30)), Rect::new(50, 0, 50, 20));
        assert_eq!(a.intersect(a), a);
        let disjoint = a.intersect(Rect::new(0, -50, 100, 50));
        assert!(disjoint.is_empty());
        assert!(!disjoint.contains(Point::new(0, 0)));
    }

    #[test]
    fn rect_contains_is_half_open() {
        let rect = Rect::new(10, 10, 100, 50);
        assert!(rect.contains(Point::new(10, 10)));
        assert!(rect.contains(Point::new(109, 59)));
        assert!(!rect.contains(Point::new(110, 30)));
        assert!(!rect.contains(Point::new(50, 60)));
    }
}

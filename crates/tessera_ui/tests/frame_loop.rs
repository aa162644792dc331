//! # Frame Loop Tests
//!
//! Whole-frame behaviour through the public `Context` API: identity,
//! layout flow, z-ordered replay, deferred requests and docking driven by
//! pointer events.
//!
//! Run with: cargo test --package tessera_ui --test frame_loop

use tessera_ui::render::RecordingRenderer;
use tessera_ui::{
    Clipping, Context, ContextConfig, DockPosition, ElementType, FrameHints, InputEvent, MouseButton,
    Options, Rect, Request, StyleState, Vec2,
};

const A_RECT: Rect = Rect::new(0.0, 0.0, 200.0, 150.0);
const B_RECT: Rect = Rect::new(300.0, 0.0, 300.0, 300.0);

fn context() -> Context {
    Context::new(ContextConfig::default())
}

fn window(ctx: &mut Context, title: &str, rect: Rect, options: Options) {
    if ctx.begin_window(title, rect, options) {
        ctx.end_window();
    }
}

/// One frame with windows "A" and "B".
fn two_windows(ctx: &mut Context) {
    ctx.begin(FrameHints::default());
    window(ctx, "A", A_RECT, Options::NONE);
    window(ctx, "B", B_RECT, Options::NONE);
    ctx.end(true);
}

// ============================================================================
// IDENTITY & LAYOUT
// ============================================================================

#[test]
fn test_container_identity_survives_frames() {
    let mut ctx = context();
    two_windows(&mut ctx);
    let first = ctx.container_by_name("A");
    two_windows(&mut ctx);
    let second = ctx.container_by_name("A");

    assert!(first.is_some());
    assert_eq!(first, second);
    assert_ne!(ctx.container_by_name("A"), ctx.container_by_name("B"));
}

#[test]
fn test_fixed_then_fill_row_wraps() {
    let mut ctx = context();
    ctx.begin(FrameHints::default());
    assert!(ctx.begin_window("Layout", Rect::new(0.0, 0.0, 300.0, 200.0), Options::NONE));
    ctx.layout_row(&[50.0, -1.0], 20.0);
    let first = ctx.layout_next();
    let fill = ctx.layout_next();
    let wrapped = ctx.layout_next();
    let body = ctx.current_container().and_then(|r| ctx.container(r)).map(|c| c.body);
    ctx.end_window();
    ctx.end(true);

    assert_eq!(first.width, 50.0);
    assert_eq!(first.height, 20.0);
    assert!(fill.x > first.right());
    assert!(body.is_some_and(|b| fill.right() <= b.right() && fill.right() > b.right() - 10.0));
    assert_eq!(wrapped.x, first.x);
    assert!(wrapped.y > first.y);
    assert_eq!(wrapped.width, 50.0);
}

#[test]
fn test_clip_push_pop_restores() {
    let mut ctx = context();
    ctx.begin(FrameHints::default());
    assert!(ctx.begin_window("Clip", Rect::new(0.0, 0.0, 300.0, 200.0), Options::NONE));
    let before = ctx.clip_rect();
    ctx.push_clip(Rect::new(10.0, 40.0, 50.0, 50.0));
    assert_eq!(ctx.check_clip(Rect::new(200.0, 150.0, 10.0, 10.0)), Clipping::All);
    assert_eq!(ctx.check_clip(Rect::new(20.0, 50.0, 10.0, 10.0)), Clipping::None);
    assert_eq!(ctx.check_clip(Rect::new(40.0, 50.0, 40.0, 10.0)), Clipping::Part);
    ctx.pop_clip();
    assert_eq!(ctx.clip_rect(), before);
    ctx.end_window();
    ctx.end(true);
}

// ============================================================================
// Z-ORDER
// ============================================================================

#[test]
fn test_roots_replay_in_zindex_order() {
    let mut ctx = context();
    let frame = |ctx: &mut Context| {
        ctx.begin(FrameHints::default());
        window(ctx, "One", Rect::new(0.0, 0.0, 120.0, 80.0), Options::NONE);
        window(ctx, "Two", Rect::new(20.0, 20.0, 120.0, 80.0), Options::NONE);
        window(ctx, "Three", Rect::new(40.0, 40.0, 120.0, 80.0), Options::NONE);
        ctx.end(true);
    };
    frame(&mut ctx);

    for (name, z) in [("One", 3), ("Two", 1), ("Three", 2)] {
        let r = ctx.container_by_name(name);
        if let Some(c) = r.and_then(|r| ctx.container_mut(r)) {
            c.zindex = z;
        }
    }
    frame(&mut ctx);

    let mut renderer = RecordingRenderer::new();
    ctx.render(&mut renderer);
    let titles: Vec<&str> = renderer.texts().collect();
    assert_eq!(titles, vec!["Two", "Three", "One"]);

    let mut cursor = 0;
    let mut walked = 0;
    while ctx.commands().next_command(&mut cursor).is_some() {
        walked += 1;
    }
    assert_eq!(walked, renderer.commands.len());
}

#[test]
fn test_newest_overlapping_window_takes_hover() {
    let mut ctx = context();
    ctx.push_event(InputEvent::MouseMove { x: 150.0, y: 100.0 });

    let control = |ctx: &mut Context, title: &str, rect: Rect| {
        assert!(ctx.begin_window(title, rect, Options::NONE));
        let id = ctx.get_id(b"body");
        let state = ctx.update_control(id, rect, Options::NONE, ElementType::Button);
        ctx.end_window();
        state
    };
    let mut states = (StyleState::Default, StyleState::Default);
    for _ in 0..3 {
        ctx.begin(FrameHints::default());
        let back = control(&mut ctx, "Back", Rect::new(0.0, 0.0, 300.0, 200.0));
        let front = control(&mut ctx, "Front", Rect::new(100.0, 50.0, 300.0, 200.0));
        ctx.end(true);
        states = (back, front);
    }

    let titles: Vec<String> = ctx
        .roots()
        .iter()
        .filter_map(|r| ctx.container(*r).map(|c| c.title.clone()))
        .collect();
    assert_eq!(titles, vec!["Back".to_string(), "Front".to_string()]);
    assert_eq!(states, (StyleState::Default, StyleState::Hover));
}

// ============================================================================
// REQUESTS
// ============================================================================

#[test]
fn test_requests_apply_at_end_of_frame() {
    let mut ctx = context();
    two_windows(&mut ctx);
    let a = ctx.container_by_name("A");

    ctx.begin(FrameHints::default());
    if let Some(a) = a {
        ctx.request(Request::Move { container: a, delta: Vec2::new(15.0, 5.0) });
    }
    window(&mut ctx, "A", A_RECT, Options::NONE);
    let during = a.and_then(|a| ctx.container(a)).map(|c| c.rect);
    ctx.end(true);
    let after = a.and_then(|a| ctx.container(a)).map(|c| c.rect);

    assert_eq!(during, Some(A_RECT));
    assert_eq!(after, Some(A_RECT.offset(Vec2::new(15.0, 5.0))));
}

#[test]
fn test_dock_sequence_keeps_trees_valid() {
    let mut ctx = context();
    let frame = |ctx: &mut Context, request: Option<Request>| {
        ctx.begin(FrameHints::default());
        for (i, name) in ["A", "B", "C"].iter().enumerate() {
            #[allow(clippy::cast_precision_loss)]
            let rect = Rect::new(i as f32 * 250.0, 0.0, 200.0, 200.0);
            window(ctx, name, rect, Options::NONE);
        }
        if let Some(request) = request {
            ctx.request(request);
        }
        ctx.end(true);
    };
    frame(&mut ctx, None);
    let [a, b, c] = ["A", "B", "C"].map(|n| ctx.container_by_name(n));
    let (Some(a), Some(b), Some(c)) = (a, b, c) else {
        panic!("windows not created");
    };

    frame(&mut ctx, Some(Request::Dock { child: a, parent: b, position: DockPosition::Left, ratio: 0.5 }));
    assert!(ctx.validate_dock().is_ok());
    assert_eq!(ctx.dock().split_count(), 1);

    frame(&mut ctx, Some(Request::Dock { child: c, parent: a, position: DockPosition::Tab, ratio: 0.5 }));
    assert!(ctx.validate_dock().is_ok());
    assert_eq!(ctx.dock().tab_bar_count(), 1);
    assert!(ctx.container(a).is_some_and(|w| !w.visible));
    assert!(ctx.container(c).is_some_and(|w| w.visible));

    frame(&mut ctx, Some(Request::Undock { container: b, rect: Rect::new(0.0, 300.0, 200.0, 200.0) }));
    assert!(ctx.validate_dock().is_ok());
    assert_eq!(ctx.dock().split_count(), 0);
    assert_eq!(ctx.dock().tab_bar_count(), 1);

    frame(&mut ctx, Some(Request::Undock { container: c, rect: Rect::new(0.0, 300.0, 200.0, 200.0) }));
    assert!(ctx.validate_dock().is_ok());
    assert_eq!(ctx.dock().tab_bar_count(), 0);
    assert!(ctx.container(a).is_some_and(|w| w.visible && !w.is_docked()));
}

#[test]
fn test_hidden_tab_is_not_built() {
    let mut ctx = context();
    two_windows(&mut ctx);
    let (Some(a), Some(b)) = (ctx.container_by_name("A"), ctx.container_by_name("B")) else {
        panic!("windows not created");
    };

    ctx.begin(FrameHints::default());
    ctx.request(Request::Dock { child: a, parent: b, position: DockPosition::Tab, ratio: 0.5 });
    window(&mut ctx, "A", A_RECT, Options::NONE);
    window(&mut ctx, "B", B_RECT, Options::NONE);
    ctx.end(true);

    ctx.begin(FrameHints::default());
    let shown_a = ctx.begin_window("A", A_RECT, Options::NONE);
    if shown_a {
        ctx.end_window();
    }
    let shown_b = ctx.begin_window("B", B_RECT, Options::NONE);
    if shown_b {
        ctx.end_window();
    }
    ctx.end(true);

    assert!(shown_a);
    assert!(!shown_b);
    assert_eq!(ctx.container(a).map(|c| c.rect), Some(B_RECT));
}

#[test]
fn test_dockspace_accepts_first_window() {
    let mut ctx = context();
    let space_rect = Rect::new(0.0, 0.0, 800.0, 600.0);
    let frame = |ctx: &mut Context| {
        ctx.begin(FrameHints::default());
        window(ctx, "Space", space_rect, Options::DOCKSPACE | Options::NO_CLOSE);
        window(ctx, "Tool", Rect::new(900.0, 0.0, 200.0, 200.0), Options::NONE);
        ctx.end(true);
    };
    frame(&mut ctx);
    let (Some(space), Some(tool)) = (ctx.container_by_name("Space"), ctx.container_by_name("Tool")) else {
        panic!("windows not created");
    };

    ctx.begin(FrameHints::default());
    ctx.request(Request::Dock { child: tool, parent: space, position: DockPosition::Left, ratio: 1.0 });
    ctx.end(true);
    frame(&mut ctx);

    assert!(ctx.validate_dock().is_ok());
    let body = ctx.container(space).map(|c| c.body);
    let placed = ctx.container(tool).map(|c| c.rect);
    assert!(ctx.container(space).is_some_and(|c| c.dockspace_root.is_some()));
    assert_eq!(placed, body);
}

// ============================================================================
// POINTER-DRIVEN DOCKING
// ============================================================================

#[test]
fn test_title_drag_docks_onto_left_zone() {
    let mut ctx = context();

    ctx.push_event(InputEvent::MouseMove { x: 50.0, y: 10.0 });
    two_windows(&mut ctx);
    two_windows(&mut ctx);

    ctx.push_event(InputEvent::MouseDown { button: MouseButton::Left });
    two_windows(&mut ctx);
    let a = ctx.container_by_name("A");
    assert!(a.is_some());
    assert_eq!(ctx.dragged_container(), a);

    // Centre of B's left zone.
    ctx.push_event(InputEvent::MouseMove { x: 410.0, y: 150.0 });
    two_windows(&mut ctx);
    assert_eq!(ctx.dragged_container(), a);

    ctx.push_event(InputEvent::MouseUp { button: MouseButton::Left });
    two_windows(&mut ctx);

    assert_eq!(ctx.dragged_container(), None);
    assert_eq!(ctx.dock().split_count(), 1);
    assert!(ctx.validate_dock().is_ok());
    let docked = a.and_then(|a| ctx.container(a));
    assert!(docked.is_some_and(|c| c.split.is_some() && c.rect.x == B_RECT.x && c.rect.width < B_RECT.width));
}

#[test]
fn test_release_away_from_zones_leaves_floating() {
    let mut ctx = context();

    ctx.push_event(InputEvent::MouseMove { x: 50.0, y: 10.0 });
    two_windows(&mut ctx);
    two_windows(&mut ctx);
    ctx.push_event(InputEvent::MouseDown { button: MouseButton::Left });
    two_windows(&mut ctx);

    ctx.push_event(InputEvent::MouseMove { x: 320.0, y: 280.0 });
    two_windows(&mut ctx);
    ctx.push_event(InputEvent::MouseUp { button: MouseButton::Left });
    two_windows(&mut ctx);

    assert_eq!(ctx.dock().split_count(), 0);
    let a = ctx.container_by_name("A").and_then(|a| ctx.container(a));
    assert!(a.is_some_and(|c| !c.is_docked() && c.rect.x == 270.0 && c.rect.y == 270.0));
}

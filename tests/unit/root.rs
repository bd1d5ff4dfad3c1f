use std::cell::Cell;

use super::*;

struct Trigger {
    rect: Cell<Option<Rect>>,
}

impl Measure for Trigger {
    fn measure(&self) -> Option<Rect> {
        self.rect.get()
    }
}

fn trigger(rect: Rect) -> Rc<Trigger> {
    Rc::new(Trigger {
        rect: Cell::new(Some(rect)),
    })
}

#[test]
fn open_measures_and_records_the_origin() {
    let t = trigger(Rect::new(20.0, 500.0, 100.0, 40.0));
    let node: Rc<dyn Measure> = t.clone();
    let mut root = GenieRoot::new("menu");
    assert_eq!(root.open(&node), Some(Rect::new(20.0, 500.0, 100.0, 40.0)));
    assert!(root.is_open());
    let origin = root.origin().unwrap();
    assert_eq!(origin.point, Point::new(70.0, 520.0));
}

#[test]
fn close_re_measures_a_moved_origin() {
    let t = trigger(Rect::new(20.0, 500.0, 100.0, 40.0));
    let node: Rc<dyn Measure> = t.clone();
    let mut root = GenieRoot::new("menu");
    root.open(&node);
    t.rect.set(Some(Rect::new(40.0, 480.0, 100.0, 40.0)));
    assert_eq!(root.close(), Some(Rect::new(40.0, 480.0, 100.0, 40.0)));
    assert!(!root.is_open());
    assert_eq!(root.origin().unwrap().point, Point::new(90.0, 500.0));
}

#[test]
fn sub_pixel_jitter_keeps_the_stored_origin() {
    let t = trigger(Rect::new(20.0, 500.0, 100.0, 40.0));
    let node: Rc<dyn Measure> = t.clone();
    let mut root = GenieRoot::new("menu");
    root.open(&node);
    t.rect.set(Some(Rect::new(20.2, 500.1, 100.0, 40.0)));
    assert_eq!(root.measure_origin(), Some(Rect::new(20.0, 500.0, 100.0, 40.0)));
}

#[test]
fn dropped_trigger_falls_back_to_the_last_rect() {
    let t = trigger(Rect::new(0.0, 0.0, 10.0, 10.0));
    let node: Rc<dyn Measure> = t.clone();
    let mut root = GenieRoot::new("menu");
    root.open(&node);
    drop(node);
    drop(t);
    assert_eq!(root.close(), Some(Rect::new(0.0, 0.0, 10.0, 10.0)));
}

#[test]
fn open_at_centres_a_nominal_rect_on_the_point() {
    let mut root = GenieRoot::new("g");
    let rect = root.open_at(Point::new(50.0, 50.0), 20.0, 10.0);
    assert_eq!(rect, Rect::new(40.0, 45.0, 20.0, 10.0));
    assert_eq!(root.close(), Some(rect));
}

#[test]
fn toggle_flips_the_open_flag() {
    let node: Rc<dyn Measure> = trigger(Rect::new(0.0, 0.0, 10.0, 10.0));
    let mut root = GenieRoot::new("g");
    root.toggle(&node);
    assert!(root.is_open());
    root.toggle(&node);
    assert!(!root.is_open());
}

#[test]
fn slots_carry_linked_ids_and_state() {
    let mut root = GenieRoot::new("menu");
    let closed = root.trigger_slot();
    assert_eq!(closed.id, "menu-trigger");
    assert_eq!(closed.aria_controls, "menu-content");
    assert_eq!(closed.aria_haspopup, "dialog");
    assert!(!closed.aria_expanded);
    assert_eq!(closed.data_state.as_str(), "closed");

    root.open_at(Point::ZERO, 1.0, 1.0);
    let content = root.content_slot();
    assert_eq!(content.role, "dialog");
    assert!(content.aria_modal);
    assert_eq!(content.aria_labelledby, "menu-trigger");
    assert_eq!(content.data_state, DataState::Open);
    assert!(root.trigger_slot().aria_expanded);
}

#[test]
fn single_child_contract_is_a_usage_error() {
    assert!(expect_single_child(1, "GenieTrigger").is_ok());
    let err = expect_single_child(2, "GenieTrigger").unwrap_err();
    assert!(matches!(err, GenieError::Usage(_)));
    assert!(!err.is_recoverable());
    assert!(err.to_string().contains("got 2"));
    assert!(expect_single_child(0, "GenieContent").is_err());
}

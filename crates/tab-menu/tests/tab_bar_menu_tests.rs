//! Tests for the per-control wrapper.

mod support;

use std::sync::Arc;
use std::time::Duration;

use support::{MockDelegate, MockTabBar, init_tracing};
use tab_menu::{Menu, OverflowTrigger, TabBarMenu, TaskQueue};

fn menus(bar: &Arc<MockTabBar>) -> (Arc<TaskQueue>, TabBarMenu) {
    init_tracing();
    let queue = Arc::new(TaskQueue::new());
    let menus = TabBarMenu::new(bar.clone(), queue.clone());
    (queue, menus)
}

#[test]
fn test_nothing_attached_until_delegate_assigned() {
    let bar = MockTabBar::with_tabs(1, 3);
    let (_queue, menus) = menus(&bar);

    assert!(!menus.coordinator().is_attached());
    assert_eq!(bar.recognizer_count(), 0);
    assert!(!bar.items_notifier().has_selection_handler());
}

#[test]
fn test_delegate_assignment_attaches_and_removal_detaches() {
    let bar = MockTabBar::with_tabs(1, 3);
    let (_queue, menus) = menus(&bar);

    menus.set_delegate(Some(Arc::new(MockDelegate::tabs())));
    assert!(menus.coordinator().is_attached());
    assert!(menus.delegate().is_some());
    assert_eq!(bar.recognizer_count(), 3);

    menus.set_delegate(None);
    assert!(!menus.coordinator().is_attached());
    assert!(menus.delegate().is_none());
    assert_eq!(bar.recognizer_count(), 0);
    assert_eq!(bar.items_notifier().items_changed.connection_count(), 0);
}

#[test]
fn test_replacing_delegate_keeps_one_attachment() {
    let bar = MockTabBar::with_tabs(1, 3);
    let (_queue, menus) = menus(&bar);

    menus.set_delegate(Some(Arc::new(MockDelegate::tabs())));
    menus.set_delegate(Some(Arc::new(MockDelegate::tabs())));

    assert_eq!(bar.recognizer_count(), 3);
    assert_eq!(bar.items_notifier().items_changed.connection_count(), 1);
}

#[test]
fn test_delegate_assignment_synchronizes_once() {
    let bar = MockTabBar::with_tabs(1, 3);
    let (_queue, menus) = menus(&bar);

    menus.set_delegate(Some(Arc::new(MockDelegate::tabs())));
    assert_eq!(bar.install_count(), 3);

    menus.set_delegate(Some(Arc::new(MockDelegate::tabs())));
    assert_eq!(bar.install_count(), 6);
    assert_eq!(bar.recognizer_count(), 3);

    menus.set_delegate(None);
    assert_eq!(bar.install_count(), 6);
    assert_eq!(bar.recognizer_count(), 0);
}

#[test]
fn test_configuration_guard_applies_on_drop() {
    let bar = MockTabBar::with_tabs(1, 3);
    let (_queue, mut menus) = menus(&bar);
    menus.set_delegate(Some(Arc::new(MockDelegate::tabs())));

    {
        let mut configuration = menus.configuration_mut();
        configuration.set_minimum_press_duration(Duration::from_millis(500));
        configuration.set_overflow_trigger(OverflowTrigger::Tap);
    }

    assert_eq!(
        menus.configuration().minimum_press_duration(),
        Duration::from_millis(500)
    );
    assert_eq!(menus.coordinator().configuration(), menus.configuration());
    for recognizer in bar.recognizers().values() {
        assert_eq!(recognizer.duration, Duration::from_millis(500));
    }
}

#[test]
fn test_unchanged_configuration_guard_does_not_resynchronize() {
    let bar = MockTabBar::with_tabs(1, 3);
    let (_queue, mut menus) = menus(&bar);
    menus.set_delegate(Some(Arc::new(MockDelegate::tabs())));
    let before = bar.recognizers();

    {
        let mut configuration = menus.configuration_mut();
        let current = configuration.max_visible_count();
        configuration.set_max_visible_count(current);
    }

    let after = bar.recognizers();
    let mut before_ids: Vec<_> = before.keys().copied().collect();
    let mut after_ids: Vec<_> = after.keys().copied().collect();
    before_ids.sort();
    after_ids.sort();
    assert_eq!(before_ids, after_ids);
}

#[test]
fn test_update_visible_menu_through_wrapper() {
    let bar = MockTabBar::with_tabs(1, 3);
    let (queue, menus) = menus(&bar);
    menus.set_delegate(Some(Arc::new(MockDelegate::tabs())));

    assert!(!menus.update_visible_menu(Menu::new("Nothing shown")));

    bar.long_press(1);
    queue.run_turn();
    assert!(menus.update_visible_menu(Menu::new("Updated")));
}

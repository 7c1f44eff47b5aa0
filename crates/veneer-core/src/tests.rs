#[cfg(test)]
mod tests {
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;

    use crate::*;

    #[test]
    fn test_signal_basic() {
        let sig = signal(42);
        assert_eq!(sig.get(), 42);

        sig.set(100);
        assert_eq!(sig.get(), 100);

        sig.update(|v| *v += 1);
        assert_eq!(sig.get(), 101);
    }

    #[test]
    fn test_signal_subscription() {
        let sig = signal(0);
        let seen = Rc::new(RefCell::new(Vec::new()));

        let seen_clone = seen.clone();
        let id = sig.subscribe(move |v| seen_clone.borrow_mut().push(*v));

        sig.set(42);
        assert!(sig.unsubscribe(id));
        sig.set(7);

        assert_eq!(*seen.borrow(), vec![42]);
        assert_eq!(sig.subscriber_count(), 0);
    }

    #[test]
    fn test_set_if_changed_skips_equal_values() {
        let sig = signal(false);
        let hits = Rc::new(Cell::new(0));
        let hits_clone = hits.clone();
        sig.subscribe(move |_| hits_clone.set(hits_clone.get() + 1));

        assert!(!sig.set_if_changed(false));
        assert!(sig.set_if_changed(true));
        assert!(!sig.set_if_changed(true));
        assert_eq!(hits.get(), 1);
    }

    #[test]
    fn test_subscriber_may_read_signal() {
        let sig = signal(1);
        let observed = Rc::new(Cell::new(0));
        let (sig2, observed2) = (sig.clone(), observed.clone());
        sig.subscribe(move |_| observed2.set(sig2.get() * 10));

        sig.set(3);
        assert_eq!(observed.get(), 30);
    }

    #[test]
    fn test_scope_explicit_dispose() {
        let cleaned_up = Rc::new(Cell::new(false));

        let scope = Scope::new();
        let cleaned_up_clone = cleaned_up.clone();
        scope.add_disposer(move || cleaned_up_clone.set(true));

        assert!(!cleaned_up.get());
        scope.dispose();
        assert!(cleaned_up.get());
        assert!(scope.is_disposed());
    }

    #[test]
    fn test_scope_disposes_children_first_and_once() {
        let order = Rc::new(RefCell::new(Vec::new()));
        let parent = Scope::new();
        let child = parent.child();

        let o = order.clone();
        parent.add_disposer(move || o.borrow_mut().push("parent"));
        let o = order.clone();
        child.add_disposer(move || o.borrow_mut().push("child"));

        parent.dispose();
        parent.dispose();
        assert_eq!(*order.borrow(), vec!["child", "parent"]);
    }

    #[test]
    fn test_disposer_added_after_dispose_runs_immediately() {
        let scope = Scope::new();
        scope.dispose();
        let ran = Rc::new(Cell::new(false));
        let r = ran.clone();
        scope.add_disposer(move || r.set(true));
        assert!(ran.get());
    }

    #[test]
    fn test_key_based_remember() {
        let comp = Composition::new();
        let (val1, val2) = comp.compose(|| {
            let a = remember_with_key("test", || 42);
            let b = remember_with_key("test", || 100);
            (a, b)
        });

        assert_eq!(*val1, 42);
        assert_eq!(*val2, 42); // Not 100, because key exists
    }

    #[test]
    fn test_remember_outside_composition_is_fresh() {
        let a = remember_state_with_key("loose", || 1);
        *a.borrow_mut() = 2;
        let b = remember_state_with_key("loose", || 1);
        assert_eq!(*b.borrow(), 1);
    }

    #[test]
    fn test_effect_cleanup_on_dispose() {
        let unmounted = Rc::new(Cell::new(false));
        let comp = Composition::new();
        let u = unmounted.clone();
        comp.compose(|| {
            effect(move || on_unmount(move || u.set(true)));
        });
        assert!(!unmounted.get());
        comp.dispose();
        assert!(unmounted.get());
    }

    #[test]
    fn test_disposable_effect_reruns_on_key_change() {
        let log = Rc::new(RefCell::new(Vec::<String>::new()));
        let comp = Composition::new();

        let run = |key: u32| {
            let log = log.clone();
            comp.compose(move || {
                disposable_effect("probe", key, move || {
                    log.borrow_mut().push(format!("start {key}"));
                    let log = log.clone();
                    on_unmount(move || log.borrow_mut().push(format!("stop {key}")))
                });
            });
        };

        run(1);
        run(1);
        run(2);
        comp.dispose();

        assert_eq!(
            *log.borrow(),
            vec!["start 1", "stop 1", "start 2", "stop 2"]
        );
    }

    #[test]
    fn test_dispose_runs_once() {
        let hits = Rc::new(Cell::new(0));
        let h = hits.clone();
        let d = Dispose::new(move || h.set(h.get() + 1));
        d.run();
        d.clone().run();
        assert_eq!(hits.get(), 1);
        assert!(d.is_spent());
    }

    #[test]
    fn test_memory_storage_notifies_other_contexts_only() {
        let tab_a = MemoryStorage::new();
        let tab_b = tab_a.context();
        let seen_a = Rc::new(RefCell::new(Vec::new()));
        let seen_b = Rc::new(RefCell::new(Vec::new()));

        let s = seen_a.clone();
        let _da = tab_a.subscribe(Rc::new(move |c: &StorageChange| {
            s.borrow_mut().push(c.clone())
        }));
        let s = seen_b.clone();
        let db = tab_b.subscribe(Rc::new(move |c: &StorageChange| {
            s.borrow_mut().push(c.clone())
        }));

        tab_a.set_item("theme", "\"dark\"").unwrap();
        tab_a.set_item("theme", "\"dark\"").unwrap();

        assert!(seen_a.borrow().is_empty());
        assert_eq!(seen_b.borrow().len(), 1);
        let change = seen_b.borrow()[0].clone();
        assert_eq!(change.key.as_deref(), Some("theme"));
        assert_eq!(change.new_value.as_deref(), Some("\"dark\""));
        assert_eq!(change.origin, tab_a.id());
        assert_eq!(tab_b.get_item("theme").unwrap().as_deref(), Some("\"dark\""));

        db.run();
        assert_eq!(tab_a.listener_count(), 1);
    }

    #[test]
    fn test_memory_storage_quota_and_unavailable() {
        let store = MemoryStorage::new();
        store.set_quota(Some(8));
        assert!(store.set_item("k", "1234").is_ok());
        assert_eq!(
            store.set_item("k", "123456789"),
            Err(StorageError::QuotaExceeded { key: "k".into() })
        );
        assert_eq!(store.get_item("k").unwrap().as_deref(), Some("1234"));

        store.set_unavailable(true);
        assert_eq!(store.get_item("k"), Err(StorageError::Unavailable));
    }

    #[test]
    fn test_memory_scroll_tracks_passive_listeners() {
        let scroll = MemoryScroll::new();
        let last = Rc::new(Cell::new(-1.0));
        let l = last.clone();
        let d = scroll.subscribe(ListenerOptions::PASSIVE, Rc::new(move |o| l.set(o)));

        scroll.scroll_to(120.0);
        assert_eq!(last.get(), 120.0);
        assert_eq!(scroll.offset(), 120.0);
        assert_eq!(scroll.passive_listener_count(), 1);

        d.run();
        assert_eq!(scroll.listener_count(), 0);
    }

    #[test]
    fn test_platform_local_override() {
        let storage = MemoryStorage::new();
        let p = Platform::memory_with(storage.clone(), MemoryScroll::new());
        with_platform(p, || {
            platform().storage.set_item("k", "v").unwrap();
        });
        assert_eq!(storage.get_item("k").unwrap().as_deref(), Some("v"));
        assert!(platform().storage.get_item("k").unwrap().is_none());
    }

    #[test]
    fn test_collecting_sink() {
        let sink = CollectingSink::new();
        sink.report(Diagnostic::DecodeFailed {
            key: "k".into(),
            message: "bad".into(),
        });
        assert_eq!(sink.len(), 1);
        let d = sink.take();
        assert_eq!(d[0].key(), "k");
        assert_eq!(d[0].to_string(), "error decoding storage key \"k\": bad");
        assert!(sink.is_empty());
    }
}

use crate::events::{ActionKind, LibraryEvent};

/// Trait for session change observation
pub trait LibraryObserver {
    /// Called after a borrow, return or undo has been applied
    fn on_event(&self, event: &LibraryEvent);
}

/// Logs every session change
#[derive(Debug)]
pub struct TransactionLogger;

impl LibraryObserver for TransactionLogger {
    fn on_event(&self, event: &LibraryEvent) {
        match event {
            LibraryEvent::Borrowed { book, .. } => tracing::info!(%book, "book borrowed"),
            LibraryEvent::Returned { book } => tracing::info!(%book, "book returned"),
            LibraryEvent::Undone(action) => {
                tracing::info!(book = %action.book, kind = ?action.kind, "action undone");
            }
        }
    }
}

/// Emits notices for changes a reader would want pointed out
#[derive(Debug)]
pub struct NotificationService;

impl LibraryObserver for NotificationService {
    fn on_event(&self, event: &LibraryEvent) {
        match event {
            LibraryEvent::Borrowed { book, strengthened } if !strengthened.is_empty() => {
                for (other, previous) in strengthened {
                    tracing::info!(%book, %other, previous, "affinity strengthened by co-borrow");
                }
            }
            LibraryEvent::Undone(action) if action.kind == ActionKind::Borrow => {
                tracing::info!(book = %action.book, "borrow reverted, book back on the shelf");
            }
            LibraryEvent::Undone(action) => {
                tracing::info!(book = %action.book, "return reverted, book borrowed again");
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use std::{
        cell::RefCell,
        io,
        rc::Rc,
        sync::{Arc, Mutex},
    };

    use super::*;
    use crate::{book::Isbn, events::Action};

    /// Observer that remembers every event it sees
    struct Recorder(Rc<RefCell<Vec<LibraryEvent>>>);

    impl LibraryObserver for Recorder {
        fn on_event(&self, event: &LibraryEvent) {
            self.0.borrow_mut().push(event.clone());
        }
    }

    /// Log sink shared with the subscriber
    struct Capture(Arc<Mutex<Vec<u8>>>);

    impl io::Write for Capture {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            if let Ok(mut bytes) = self.0.lock() {
                bytes.extend_from_slice(buf);
            }
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    /// Everything `observer` logs while handling `events`
    fn logged(observer: &dyn LibraryObserver, events: &[LibraryEvent]) -> String {
        let buffer = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&buffer);
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || Capture(Arc::clone(&sink)))
            .with_ansi(false)
            .without_time()
            .with_target(false)
            .finish();
        tracing::subscriber::with_default(subscriber, || {
            for event in events {
                observer.on_event(event);
            }
        });
        let bytes = buffer.lock().map(|bytes| bytes.clone()).unwrap_or_default();
        String::from_utf8_lossy(&bytes).into_owned()
    }

    #[test]
    fn test_transaction_logger_reports_every_change() {
        let output = logged(
            &TransactionLogger,
            &[
                LibraryEvent::Borrowed { book: Isbn::new("001"), strengthened: Vec::new() },
                LibraryEvent::Returned { book: Isbn::new("002") },
                LibraryEvent::Undone(Action::borrow(Isbn::new("003"))),
            ],
        );

        assert_eq!(output.lines().count(), 3);
        assert!(output.contains("book borrowed book=001"));
        assert!(output.contains("book returned book=002"));
        assert!(output.contains("action undone book=003 kind=Borrow"));
    }

    #[test]
    fn test_notifications_only_for_notable_changes() {
        let quiet = logged(
            &NotificationService,
            &[
                LibraryEvent::Borrowed { book: Isbn::new("001"), strengthened: Vec::new() },
                LibraryEvent::Returned { book: Isbn::new("001") },
            ],
        );
        assert!(quiet.is_empty());

        let output = logged(
            &NotificationService,
            &[
                LibraryEvent::Borrowed {
                    book: Isbn::new("003"),
                    strengthened: vec![(Isbn::new("001"), 1)],
                },
                LibraryEvent::Undone(Action::borrow(Isbn::new("003"))),
                LibraryEvent::Undone(Action::return_of(Isbn::new("001"))),
            ],
        );
        assert!(output.contains("affinity strengthened by co-borrow book=003 other=001 previous=1"));
        assert!(output.contains("borrow reverted, book back on the shelf book=003"));
        assert!(output.contains("return reverted, book borrowed again book=001"));
    }

    #[test]
    fn test_custom_observer_sees_events_in_order() {
        let events = [
            LibraryEvent::Borrowed { book: Isbn::new("001"), strengthened: vec![(Isbn::new("002"), 1)] },
            LibraryEvent::Returned { book: Isbn::new("001") },
            LibraryEvent::Undone(Action::borrow(Isbn::new("001"))),
        ];
        let seen = Rc::new(RefCell::new(Vec::new()));
        let recorder = Recorder(Rc::clone(&seen));

        for event in &events {
            recorder.on_event(event);
        }
        assert_eq!(seen.borrow().as_slice(), &events);
    }
}

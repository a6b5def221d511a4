use std::{
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc,
    },
    time::Duration,
};

use tokio::{sync::watch, task::JoinHandle};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Error,
}

impl NoticeKind {
    pub fn css_class(&self) -> &'static str {
        match self {
            NoticeKind::Success => "success",
            NoticeKind::Error => "error",
        }
    }
}

/// The message shown below the signup form after a submission.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Notice {
    id: u64,
    pub kind: NoticeKind,
    pub text: String,
    pub hide_after: Duration,
}

impl Notice {
    pub fn id(&self) -> u64 {
        self.id
    }
}

static NOTICE_ID: AtomicU64 = AtomicU64::new(1);

/// Holds at most one visible notice and hides it once its delay has passed.
///
/// Showing a notice aborts the hide timer of the one it replaces, so every notice stays up for
/// its full delay. The timer also only clears the notice it was started for.
pub struct NoticeSlot {
    current: Arc<watch::Sender<Option<Notice>>>,
    hide_timer: Option<JoinHandle<()>>,
}

impl NoticeSlot {
    pub fn new() -> Self {
        let (tx, _) = watch::channel(None);
        Self {
            current: Arc::new(tx),
            hide_timer: None,
        }
    }

    /// Must be called from within a tokio runtime, the hide timer is spawned onto it.
    pub fn show<S: Into<String>>(&mut self, kind: NoticeKind, text: S, hide_after: Duration) -> u64 {
        self.cancel_timer();
        let notice = Notice {
            id: NOTICE_ID.fetch_add(1, Ordering::Relaxed),
            kind,
            text: text.into(),
            hide_after,
        };
        let id = notice.id;
        trace!("showing notice {} for {:?}", id, hide_after);
        self.current.send_replace(Some(notice));

        let current = self.current.clone();
        self.hide_timer = Some(tokio::spawn(async move {
            tokio::time::sleep(hide_after).await;
            current.send_if_modified(|slot| match slot {
                Some(n) if n.id == id => {
                    trace!("hiding notice {}", id);
                    *slot = None;
                    true
                }
                _ => false,
            });
        }));
        id
    }

    pub fn hide(&mut self) {
        self.cancel_timer();
        self.current.send_replace(None);
    }

    pub fn current(&self) -> Option<Notice> {
        self.current.borrow().clone()
    }

    /// Observe notices appearing and disappearing, including hides done by the timer.
    pub fn subscribe(&self) -> watch::Receiver<Option<Notice>> {
        self.current.subscribe()
    }

    fn cancel_timer(&mut self) {
        if let Some(timer) = self.hide_timer.take() {
            timer.abort();
        }
    }
}

impl Default for NoticeSlot {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for NoticeSlot {
    fn drop(&mut self) {
        self.cancel_timer();
    }
}

//! Many-producer, single-consumer handoff of finished work to the frame thread.

use crossbeam_channel::{Receiver, Sender, TryRecvError, unbounded};

pub fn channel<T>() -> (HandoffSender<T>, HandoffReceiver<T>) {
    let (tx, rx) = unbounded();
    (
        HandoffSender { tx: tx.clone() },
        HandoffReceiver { tx, rx },
    )
}

pub struct HandoffSender<T> {
    tx: Sender<T>,
}

impl<T> Clone for HandoffSender<T> {
    fn clone(&self) -> Self {
        Self {
            tx: self.tx.clone(),
        }
    }
}

impl<T> HandoffSender<T> {
    /// Enqueues `item`; hands it back if the receiver is gone.
    pub fn send(&self, item: T) -> Result<(), T> {
        self.tx.send(item).map_err(|e| e.into_inner())
    }
}

pub struct HandoffReceiver<T> {
    // Kept so `sender()` can mint producers at any time
    tx: Sender<T>,
    rx: Receiver<T>,
}

impl<T> HandoffReceiver<T> {
    pub fn sender(&self) -> HandoffSender<T> {
        HandoffSender {
            tx: self.tx.clone(),
        }
    }

    pub fn try_recv(&self) -> Option<T> {
        match self.rx.try_recv() {
            Ok(item) => Some(item),
            Err(TryRecvError::Empty | TryRecvError::Disconnected) => None,
        }
    }

    /// Processes everything queued at the time of the call, in send order.
    /// Items sent while draining wait for the next call.
    pub fn drain(&self, mut f: impl FnMut(T)) -> usize {
        let queued = self.rx.len();
        let mut done = 0;
        while done < queued {
            let Ok(item) = self.rx.try_recv() else { break };
            f(item);
            done += 1;
        }
        done
    }

    pub fn len(&self) -> usize {
        self.rx.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rx.is_empty()
    }
}

use indicatif::{ProgressBar, ProgressStyle};
use tokio::sync::watch;
use tokio::sync::watch::Sender;
use tokio::task::JoinHandle;
use tokio::time;
use tokio::time::Duration;

pub struct Spinner {
    tx: Sender<bool>,
    handle: JoinHandle<()>
}
impl Spinner {
    pub fn spawn<S>(message: S) -> Self
        where
            S: AsRef<str>
    {
        let style = ProgressStyle::default_spinner()
            .template("{spinner}  {wide_msg}");
        let progress = ProgressBar::new_spinner();
        progress.set_style(style);
        progress.set_message(message.as_ref());

        let (tx, rx) = watch::channel(false);

        let handle = tokio::spawn(async move {
            while !*rx.borrow() {
                progress.tick();
                time::sleep(Duration::from_millis(50)).await;
            }
            progress.finish_and_clear();
        });

        Spinner { tx, handle }
    }

    pub async fn finish(self) {
        let _ = self.tx.send(true);
        let _ = self.handle.await;
    }
}

pub struct Bar {
    tx: Sender<(u64, u64)>,
    handle: JoinHandle<()>,
    len: u64
}
impl Bar {
    pub fn spawn<S>(message: S, len: u64) -> Self
        where
            S: AsRef<str>
    {
        let style = ProgressStyle::default_bar()
            .template("{spinner}  {msg:24} [{bar:64.cyan/blue}]  {percent}%")
            .progress_chars("#>-");
        let progress = ProgressBar::new(len);
        progress.set_style(style);
        progress.set_message(message.as_ref());

        let (tx, mut rx) = watch::channel((0, len));

        let handle = tokio::spawn(async move {
            loop {
                let (val, max) = *rx.borrow();
                progress.set_length(max);
                progress.set_position(val);
                if val >= max { break; }
                if rx.changed().await.is_err() { break; }
            }
            progress.finish();
        });

        Bar { tx, handle, len }
    }

    pub fn progress(&mut self, value: u64) {
        let _ = self.tx.send((value, self.len));
    }

    pub async fn finish(self) {
        let _ = self.tx.send((self.len, self.len));
        let _ = self.handle.await;
    }
}

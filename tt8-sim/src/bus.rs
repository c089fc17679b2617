use std::sync::Arc;

use tokio::sync::Mutex;

use crate::error::{SimulationError, SimulationErrorKind, SimulationResult};

/// A view onto a shared bus, optionally narrowed to a bit field of it.
pub struct BusSocket<T, S> {
    pub(self) contents: Arc<Mutex<T>>,
    pub(self) reader: Box<dyn Fn(T) -> S + Send + Sync>,
    pub(self) writer: Box<dyn Fn(T, S) -> T + Send + Sync>
}
impl<T, S> BusSocket<T, S> where
    T: Copy
{
    pub async fn read(&self) -> S {
        let v = *self.contents.lock().await;
        (self.reader)(v)
    }

    pub async fn write(&self, v: S) {
        let mut contents = self.contents.lock().await;
        *contents = (self.writer)(*contents, v);
    }

    /// Samples the bus without waiting; fails if another socket currently holds it.
    pub fn try_read(&self) -> SimulationResult<S> {
        let contents = self.contents.try_lock()
            .map_err(|e| SimulationError::new(SimulationErrorKind::BusUnavailable, e))?;
        Ok((self.reader)(*contents))
    }
}

pub trait Bus {
    type Contents: Copy + Send + 'static;

    fn contents(&self) -> Arc<Mutex<Self::Contents>>;
    fn make_socket<S>(&self, reader: Box<dyn Fn(Self::Contents) -> S + Send + Sync>, writer: Box<dyn Fn(Self::Contents, S) -> Self::Contents + Send + Sync>) -> BusSocket<Self::Contents, S> {
        BusSocket {
            contents: self.contents(),
            reader,
            writer
        }
    }
    fn socket(&self) -> BusSocket<Self::Contents, Self::Contents> {
        let reader = Box::new(|v: Self::Contents| v);
        let writer = Box::new(|_: Self::Contents, v: Self::Contents| v);
        self.make_socket(reader, writer)
    }
}

/// An 8-bit port, such as the command, data and output pins of the chip.
pub struct Bus8 {
    contents: Arc<Mutex<u8>>
}
impl Bus8 {
    pub fn new() -> Self {
        Bus8 {
            contents: Arc::new(Mutex::new(0))
        }
    }

    /// Bits [7:4], e.g. the opcode field of the command port.
    pub fn socket_high4(&self) -> BusSocket<u8, u8> {
        let reader = Box::new(|v: u8| v >> 4);
        let writer = Box::new(|old_v: u8, v: u8| (old_v & 0x0F) | ((v & 0x0F) << 4));
        self.make_socket(reader, writer)
    }

    /// Bits [3:0], e.g. the register field of the command port.
    pub fn socket_low4(&self) -> BusSocket<u8, u8> {
        let reader = Box::new(|v: u8| v & 0x0F);
        let writer = Box::new(|old_v: u8, v: u8| (old_v & 0xF0) | (v & 0x0F));
        self.make_socket(reader, writer)
    }
}
impl Default for Bus8 {
    fn default() -> Self {
        Bus8::new()
    }
}
impl Bus for Bus8 {
    type Contents = u8;

    fn contents(&self) -> Arc<Mutex<Self::Contents>> {
        self.contents.clone()
    }
}

//! Bus transactor model: paired request/response queues per channel.
//!
//! The read and write channels are independent FIFOs. The device dequeues
//! each request exactly once and enqueues exactly one response per request,
//! in arrival order within each channel. No ordering guarantee exists
//! between the two channels.

use std::collections::VecDeque;

use crate::error::DecodeError;

/// Read-channel request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReadReq {
    /// Access address.
    pub addr: u64,
}

/// Write-channel request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WriteReq {
    /// Access address.
    pub addr: u64,
    /// Write data.
    pub data: u64,
}

/// One read response: the register value, or the decode failure.
/// Payload is unspecified on a decode error.
pub type ReadResp = std::result::Result<u64, DecodeError>;

/// One write response: unit on success, or the decode failure.
pub type WriteResp = std::result::Result<(), DecodeError>;

/// Request/response queues terminating the register bus.
#[derive(Debug, Default)]
pub struct BusTransactor {
    read_req: VecDeque<ReadReq>,
    write_req: VecDeque<WriteReq>,
    read_resp: VecDeque<ReadResp>,
    write_resp: VecDeque<WriteResp>,
}

impl BusTransactor {
    /// Empty transactor.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Host side: enqueue a read request.
    pub fn push_read(&mut self, addr: u64) {
        self.read_req.push_back(ReadReq { addr });
    }

    /// Host side: enqueue a write request.
    pub fn push_write(&mut self, addr: u64, data: u64) {
        self.write_req.push_back(WriteReq { addr, data });
    }

    /// Host side: dequeue the oldest read response, if any.
    pub fn pop_read_resp(&mut self) -> Option<ReadResp> {
        self.read_resp.pop_front()
    }

    /// Host side: dequeue the oldest write response, if any.
    pub fn pop_write_resp(&mut self) -> Option<WriteResp> {
        self.write_resp.pop_front()
    }

    /// Read requests not yet serviced.
    #[must_use]
    pub fn pending_reads(&self) -> usize {
        self.read_req.len()
    }

    /// Write requests not yet serviced.
    #[must_use]
    pub fn pending_writes(&self) -> usize {
        self.write_req.len()
    }

    /// Drop all queued requests and responses.
    pub fn reset(&mut self) {
        self.read_req.clear();
        self.write_req.clear();
        self.read_resp.clear();
        self.write_resp.clear();
    }

    pub(crate) fn take_read(&mut self) -> Option<ReadReq> {
        self.read_req.pop_front()
    }

    pub(crate) fn take_write(&mut self) -> Option<WriteReq> {
        self.write_req.pop_front()
    }

    pub(crate) fn complete_read(&mut self, resp: ReadResp) {
        self.read_resp.push_back(resp);
    }

    pub(crate) fn complete_write(&mut self, resp: WriteResp) {
        self.write_resp.push_back(resp);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fifo_order_per_channel() {
        let mut bus = BusTransactor::new();
        bus.push_read(0x10);
        bus.push_read(0x18);
        bus.push_write(0x00, 1);

        assert_eq!(bus.take_read().unwrap().addr, 0x10);
        assert_eq!(bus.take_read().unwrap().addr, 0x18);
        assert!(bus.take_read().is_none());
        assert_eq!(bus.take_write().unwrap().data, 1);
    }

    #[test]
    fn one_response_per_request() {
        let mut bus = BusTransactor::new();
        bus.push_read(0x00);
        let req = bus.take_read().unwrap();
        bus.complete_read(Ok(req.addr));

        assert_eq!(bus.pop_read_resp(), Some(Ok(0x00)));
        assert_eq!(bus.pop_read_resp(), None);
    }

    #[test]
    fn reset_drops_everything() {
        let mut bus = BusTransactor::new();
        bus.push_read(0x00);
        bus.push_write(0x08, 9);
        bus.complete_write(Ok(()));
        bus.reset();
        assert_eq!(bus.pending_reads(), 0);
        assert_eq!(bus.pending_writes(), 0);
        assert!(bus.pop_write_resp().is_none());
    }
}

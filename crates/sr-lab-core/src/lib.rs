//! Selective-repeat protocol engines: a windowed sender and receiver that
//! speak through the `SystemContext` boundary of `sr-lab-abstract`.

pub mod checksum;
pub mod receiver;
pub mod seqspace;
pub mod sender;
pub mod timer;

pub use receiver::{ReceiverStats, SrReceiver};
pub use sender::{SenderStats, SrSender};
pub use seqspace::SeqSpace;
pub use timer::{RETRANSMIT_TIMER, RetransmitTimer};

#[cfg(test)]
mod testutil;

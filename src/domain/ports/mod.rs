//! Port trait definitions (Hexagonal Architecture)
//!
//! This module defines the collaborator interfaces the sweep core consumes:
//! - Encoder / Decoder / CodecFactory: the error-correcting code
//! - Modulator / Demodulator: bit-to-symbol mapping and soft demapping
//! - Channel: noisy transmission at an operating point
//! - ResultSink / SinkFactory: persistence of finalized points
//! - SweepObserver / ObserverFactory: progress side channel
//!
//! These traits keep the controller independent of any specific code,
//! modem, channel or output format.

pub mod channel;
pub mod codec;
pub mod modem;
pub mod observer;
pub mod result_sink;

pub use channel::Channel;
pub use codec::{
    CodeBit, Codec, CodecConstruction, CodecFactory, Decoder, Encoder, SoftBit, StructureInfo,
};
pub use modem::{Demodulator, Modulator};
pub use observer::{NullObserver, ObserverFactory, SweepObserver};
pub use result_sink::{ResultSink, SinkFactory};

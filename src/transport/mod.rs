// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! Transports: how a built command reaches the engine.
//!
//! - [`RedisTransport`]: RESP over a redis connection manager
//! - [`RecordingTransport`]: in-memory, scripted replies (tests, dry runs)

pub mod memory;
pub mod redis;
pub mod traits;

pub use self::memory::RecordingTransport;
pub use self::redis::RedisTransport;
pub use self::traits::{RawReply, Transport};

// SPDX-License-Identifier: MIT OR Apache-2.0

//! Helpers shared by the integration tests.

use atomcfg::adapters::{AtomicFileWriter, WriterOptions};
use std::sync::Once;

static TRACING: Once = Once::new();

/// Installs a tracing subscriber that writes through the test harness.
#[allow(dead_code)]
pub fn init_tracing() {
    TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .with_test_writer()
            .try_init();
    });
}

/// A writer that skips the filesystem-wide sync, which is slow under test.
#[allow(dead_code)]
pub fn test_writer() -> AtomicFileWriter {
    AtomicFileWriter::with_options(WriterOptions {
        sync_filesystem: false,
        ..WriterOptions::default()
    })
}

/// A typical device configuration file.
#[allow(dead_code)]
pub const SAMPLE_CONFIG: &str = "\
# Bluetooth stack configuration
FileSource = Empty
TimeCreated = 2024-01-01 00:00:00

[Adapter]
Address = 00:11:22:33:44:55
Name = kitchen speaker
DiscoveryTimeout = 120
ScanMode = 0x2

[aa:bb:cc:dd:ee:ff]
Name = headphones
LinkKeyType = 4
Trusted = true
";

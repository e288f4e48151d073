pub mod replay;
pub mod udp;

use api::LandmarkSource;

use crate::config::{SourceConfig, SourceKind};
use replay::ReplaySource;
use udp::UdpSource;

/// Name used for the source's log target.
pub fn source_name(config: &SourceConfig) -> &'static str {
    match config.kind {
        SourceKind::Udp => "udp",
        SourceKind::Replay => "replay",
    }
}

pub fn create_source(config: &SourceConfig) -> Box<dyn LandmarkSource> {
    match config.kind {
        SourceKind::Udp => Box::new(UdpSource::new(config.listen_port)),
        SourceKind::Replay => Box::new(ReplaySource::new(
            config.replay_path.clone(),
            config.replay_loop,
        )),
    }
}

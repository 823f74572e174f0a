//! Test fixtures for worker integration tests
//!
//! Provides reusable episodes, outcomes and pipeline configurations.

use std::time::Duration;

use fake::faker::lorem::en::Words;
use fake::Fake;
use showrss_worker::{Episode, PipelineConfig, SearchOutcome, TorrentSource};

/// Build an episode with a predictable show name
pub fn episode(id: i64) -> Episode {
    let season = 1;
    let number = (id % 20 + 1) as i32;
    Episode {
        id,
        show_id: 100,
        show_name: "Dark".to_string(),
        name: format!("Episode {}", id),
        code: format!("S{:02}E{:02}", season, number),
        season,
        episode: number,
    }
}

/// Build an episode with random show and episode titles
pub fn random_episode(id: i64) -> Episode {
    let show: Vec<String> = Words(1..3).fake();
    let title: Vec<String> = Words(2..5).fake();
    let season: i32 = (1..10).fake();
    let number: i32 = (1..24).fake();
    Episode {
        id,
        show_id: (1..10_000).fake(),
        show_name: show.join(" "),
        name: title.join(" "),
        code: format!("S{:02}E{:02}", season, number),
        season,
        episode: number,
    }
}

/// Episodes with consecutive IDs starting at `first`
pub fn episodes(first: i64, count: usize) -> Vec<Episode> {
    (0..count as i64).map(|i| episode(first + i)).collect()
}

/// A `Found` outcome naming the episode
pub fn found_for(episode: &Episode) -> SearchOutcome {
    SearchOutcome::Found(TorrentSource {
        magnet_link: format!("magnet:?xt=urn:btih:{:040X}", episode.id),
        name: format!("{}.{}.720p", episode.show_name, episode.code),
        seeders: 42,
    })
}

/// Pipeline configuration whose timer never fires during a test
pub fn test_pipeline_config() -> PipelineConfig {
    PipelineConfig {
        refresh_interval: Duration::from_secs(24 * 3600),
        ..PipelineConfig::default()
    }
}

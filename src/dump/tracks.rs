//! Track assembly for the interpolation dump mode.
//!
//! Shape observations are spread over frames; tracks are rebuilt by grouping
//! them on `track_id`. Standalone shapes are promoted to singleton tracks with
//! fresh ids above the largest existing one. A track that ends before the
//! task's stop frame gets a closing copy of its last observation, marked
//! outside, one frame later.

use std::collections::HashMap;
use std::collections::hash_map::Entry;

use crate::model::{FrameAnnotation, Shape};

/// One shape observation on a given frame.
#[derive(Debug, Clone, PartialEq)]
pub struct TrackedShape {
    /// Frame the shape was observed on
    pub frame: u64,
    /// The observed shape
    pub shape: Shape,
}

/// Observations of one object, ascending by frame.
#[derive(Debug, Clone, PartialEq)]
pub struct Track {
    /// Source track id (assigned for promoted standalone shapes)
    pub track_id: i64,
    /// Observations, never empty
    pub shapes: Vec<TrackedShape>,
}

impl Track {
    fn new(track_id: i64, first: TrackedShape) -> Self {
        Self {
            track_id,
            shapes: vec![first],
        }
    }

    /// First observation; its label and group describe the whole track.
    pub fn first(&self) -> &TrackedShape {
        &self.shapes[0]
    }

    /// Last observation.
    pub fn last(&self) -> &TrackedShape {
        &self.shapes[self.shapes.len() - 1]
    }

    /// Frames this track is observed on.
    pub fn frames(&self) -> Vec<u64> {
        self.shapes.iter().map(|s| s.frame).collect()
    }

    /// Append an outside copy of the last observation on the next frame,
    /// unless the track already reaches `stop_frame`.
    fn close(&mut self, stop_frame: u64) {
        let last = self.last();
        if last.frame >= stop_frame {
            return;
        }

        let closing = TrackedShape {
            frame: last.frame + 1,
            shape: Shape {
                outside: true,
                ..last.shape.clone()
            },
        };
        self.shapes.push(closing);
    }
}

/// Group shape observations into tracks.
///
/// Tracked shapes come first, one track per `track_id` in order of first
/// appearance, followed by one singleton track per standalone shape. Input
/// frames are expected in ascending order; observations are not re-sorted.
/// The caller's shapes are never modified.
pub fn assemble_tracks(frames: &[FrameAnnotation], stop_frame: u64) -> Vec<Track> {
    let mut tracks: Vec<Track> = Vec::new();
    let mut index: HashMap<i64, usize> = HashMap::new();
    let mut standalone: Vec<TrackedShape> = Vec::new();

    for frame in frames {
        for shape in &frame.shapes {
            let observation = TrackedShape {
                frame: frame.frame,
                shape: shape.clone(),
            };
            if shape.is_standalone() {
                standalone.push(observation);
                continue;
            }
            match index.entry(shape.track_id) {
                Entry::Occupied(entry) => tracks[*entry.get()].shapes.push(observation),
                Entry::Vacant(entry) => {
                    entry.insert(tracks.len());
                    tracks.push(Track::new(shape.track_id, observation));
                }
            }
        }
    }

    let grouped = tracks.len();
    let mut next_id = tracks
        .iter()
        .map(|t| t.track_id)
        .max()
        .map_or(0, |max| max + 1);

    for observation in standalone {
        let shape = Shape {
            track_id: next_id,
            ..observation.shape
        };
        tracks.push(Track::new(
            next_id,
            TrackedShape {
                frame: observation.frame,
                shape,
            },
        ));
        next_id += 1;
    }

    for track in &mut tracks {
        track.close(stop_frame);
    }

    log::debug!(
        "Assembled {} tracks ({} tracked, {} standalone)",
        tracks.len(),
        grouped,
        tracks.len() - grouped
    );

    tracks
}

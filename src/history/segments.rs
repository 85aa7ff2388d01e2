//! Contiguous non-up runs, used to shade outages on the trend chart.

use serde::Serialize;

use super::models::{Sample, Status};

/// A maximal stretch of one non-up status. Indices are inclusive and relative
/// to the slice the segments were computed from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RunSegment {
    pub status: Status,
    pub start_index: usize,
    pub end_index: usize,
}

/// Split the non-up samples of a slice into runs of identical status.
///
/// A switch between retrying and down without an up sample in between
/// yields two adjacent segments.
pub fn compute_run_segments(slice: &[Sample]) -> Vec<RunSegment> {
    let mut segments = Vec::new();
    let mut open: Option<(usize, Status)> = None;

    for (i, sample) in slice.iter().enumerate() {
        match (open, sample.status) {
            (Some((start, status)), Status::Up) => {
                segments.push(RunSegment {
                    status,
                    start_index: start,
                    end_index: i - 1,
                });
                open = None;
            }
            (None, Status::Up) => {}
            (None, status) => open = Some((i, status)),
            (Some((start, current)), status) if current != status => {
                segments.push(RunSegment {
                    status: current,
                    start_index: start,
                    end_index: i - 1,
                });
                open = Some((i, status));
            }
            (Some(_), _) => {}
        }
    }

    if let Some((start, status)) = open {
        segments.push(RunSegment {
            status,
            start_index: start,
            end_index: slice.len() - 1,
        });
    }

    segments
}

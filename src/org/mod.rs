// Copyright 2023-5 Seth Pendergrass. See LICENSE.

//! Sorting a directory of media into date-based folders.

mod organizer;
mod placement;
mod stage_1_scan;
mod stage_2_sorting;
mod stage_3_cleanup;

pub use organizer::*;
pub use placement::*;

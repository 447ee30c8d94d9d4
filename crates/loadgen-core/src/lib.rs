//! Load-synthesis engine: byte blocks, CPU/memory burners, URL templating.

pub mod blocks;
pub mod compute;
pub mod facet;
pub mod urltmpl;

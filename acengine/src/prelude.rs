pub use crate::{
    config::*,
    engine::*,
    nodes::{circuit::*, node::*, product::*},
    parsing::{builder::*, declaration::*},
    report::*,
    rules::{cache::*, flag::*, ProductRule, Strategy},
    utils::errors::*,
    visitors::{differentiator::*, evaluator::*, traits::*},
};

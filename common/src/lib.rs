#[macro_use]
mod macros;

agg_mod![aging, models, notify, scheduler, store];

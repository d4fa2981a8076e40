//! SeaORM entity models
//!
//! Warehouse entities maintained (or read) by the reconciliation core.
//! Staging tables and lookups are read-only here; the upstream loader owns
//! their content.

mod atp_match;
mod batch;
mod batch_log;
mod enriched_match;
mod player;
mod player_points;
mod points_rule;
mod series_rule;
mod stg_player;
mod stg_tournament;
mod team_link;
mod tournament;

pub use tournament::{
    Entity as TournamentEntity,
    Model as Tournament,
    ActiveModel as TournamentActiveModel,
    Column as TournamentColumn,
};

pub use player::{
    Entity as PlayerEntity,
    Model as Player,
    ActiveModel as PlayerActiveModel,
    Column as PlayerColumn,
};

pub use atp_match::{
    Entity as MatchEntity,
    Model as MatchRow,
    ActiveModel as MatchActiveModel,
    Column as MatchColumn,
};

pub use enriched_match::{
    Entity as EnrichedMatchEntity,
    Model as EnrichedMatch,
    ActiveModel as EnrichedMatchActiveModel,
    Column as EnrichedMatchColumn,
};

pub use player_points::{
    Entity as PlayerPointsEntity,
    Model as PlayerPoints,
    ActiveModel as PlayerPointsActiveModel,
    Column as PlayerPointsColumn,
};

pub use points_rule::{
    Entity as PointsRuleEntity,
    Model as PointsRule,
    ActiveModel as PointsRuleActiveModel,
    Column as PointsRuleColumn,
};

pub use series_rule::{
    Entity as SeriesRuleEntity,
    Model as SeriesRule,
    ActiveModel as SeriesRuleActiveModel,
    Column as SeriesRuleColumn,
};

pub use team_link::{
    Entity as TeamLinkEntity,
    Model as TeamLink,
    ActiveModel as TeamLinkActiveModel,
    Column as TeamLinkColumn,
};

pub use batch::{
    Entity as BatchEntity,
    Model as Batch,
    ActiveModel as BatchActiveModel,
    Column as BatchColumn,
    BatchStatus,
};

pub use batch_log::{
    Entity as BatchLogEntity,
    Model as BatchLog,
    ActiveModel as BatchLogActiveModel,
    Column as BatchLogColumn,
    Severity,
};

pub use stg_tournament::{
    Entity as StgTournamentEntity,
    Model as StgTournament,
    ActiveModel as StgTournamentActiveModel,
    Column as StgTournamentColumn,
};

pub use stg_player::{
    Entity as StgPlayerEntity,
    Model as StgPlayer,
    ActiveModel as StgPlayerActiveModel,
    Column as StgPlayerColumn,
};

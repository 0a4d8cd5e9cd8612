/*!
 * Data-fetch hooks
 *
 * Stateful wrappers around marketplace operations. A view mounts the hooks
 * it needs, renders from their snapshots, and cancels them when it goes
 * away.
 */

pub mod fetch;
pub mod mutation;
pub mod resources;

pub use fetch::{FetchState, FetchTask, Fetcher, Phase};
pub use mutation::{Action, MutationState, MutationTask};
pub use resources::{
    create_offer, current_user, health, is_healthy, offers, platform_stats, register_user,
};

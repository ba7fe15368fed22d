mod account;
mod event;
mod order;
mod position;

pub use account::{Account, AccountId};
pub use event::{MoneyLine, PositionEvent, PositionsUpdate, SecurityLine};
pub use order::{Direction, ExecutionStyle, OrderId, OrderIntent};
pub use position::Position;

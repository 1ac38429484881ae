//! 공시 재무정보 정규화를 위한 도메인 모델.

mod account;
mod company;
mod disclosure;
mod financial;
mod market;
mod period;
mod ratio;
mod valuation;

pub use account::*;
pub use company::*;
pub use disclosure::*;
pub use financial::*;
pub use market::*;
pub use period::*;
pub use ratio::*;
pub use valuation::*;

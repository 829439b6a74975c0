use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AnalyticsError {
    #[error("Not enough data to calculate '{0}'")]
    NotEnoughData(&'static str),

    #[error("Calculation error: Division by zero encountered in metric '{0}'")]
    DivisionByZero(&'static str),

    #[error("Calculation error: Decimal overflow in metric '{0}'")]
    Overflow(&'static str),
}

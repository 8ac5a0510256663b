pub mod elastic_net;
pub mod logistic;
pub mod regression;
pub mod sgd;
mod validate;

pub use elastic_net::{ElasticNet, Lasso};
pub use logistic::LogisticRegression;
pub use regression::{LinearRegression, Ridge};
pub use sgd::{PassiveAggressive, Perceptron, SgdRegressor};

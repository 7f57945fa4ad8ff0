pub use crate::machine_learning::decision_tree::{
    DecisionTree, DecisionTreeParams, Node, NodeType, gain_ratios,
};

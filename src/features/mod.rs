/// 资料统计徽章
pub mod badge;

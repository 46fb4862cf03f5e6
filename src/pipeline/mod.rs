pub mod stage2_classify;
pub mod stage3_group;
pub mod stage4_stats;
pub mod stage5_assemble;
pub mod stage6_report;

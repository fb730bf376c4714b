//! 营销助手（规则建议与文案建议）
//!
//! 以关键词匹配返回预置的规则和文案模板，为前端的自然语言入口
//! 提供确定性的演示实现。文案中的 `{name}` 占位符在活动执行时
//! 替换为客户姓名。

use segment_engine::{Operator, Rule, SegmentField};

/// 根据描述生成分群规则建议
///
/// 返回规则列表与一句解释。未命中任何关键词时退回通用的
/// 活跃客户规则。
pub fn suggest_rules(prompt: &str) -> (Vec<Rule>, String) {
    let prompt = prompt.to_lowercase();

    if prompt.contains("流失") || prompt.contains("inactive") || prompt.contains("haven't shopped")
    {
        let rules = vec![
            Rule::condition(SegmentField::LastPurchaseDate, Operator::Lt, "180"),
            Rule::condition(SegmentField::TotalSpend, Operator::Gt, "5000"),
        ];
        let explanation =
            "筛选近 6 个月未消费、历史消费超过 5000 的流失高价值客户。".to_string();
        return (rules, explanation);
    }

    if prompt.contains("高价值") || prompt.contains("high value") || prompt.contains("spent over")
    {
        let rules = vec![
            Rule::condition(SegmentField::TotalSpend, Operator::Gt, "10000"),
            Rule::condition(SegmentField::VisitCount, Operator::Gt, "5"),
        ];
        let explanation = "筛选累计消费超过 10000 且到店超过 5 次的高价值客户。".to_string();
        return (rules, explanation);
    }

    let rules = vec![Rule::condition(SegmentField::VisitCount, Operator::Gt, "3")];
    (rules, "筛选到店超过 3 次的活跃客户。".to_string())
}

/// 根据活动目标生成文案与配图建议
pub fn suggest_messages(objective: &str) -> (Vec<String>, Vec<String>) {
    let objective = objective.to_lowercase();

    if objective.contains("流失") || objective.contains("inactive") {
        let messages = vec![
            "{name}，好久不见！回来看看吧，下一单立享 85 折，优惠码 WELCOME15。".to_string(),
            "{name}，您有一段时间没来了，新品已上架，用 COMEBACK20 享专属折扣。".to_string(),
            "{name}，我们想您了！今日回归，满 1000 免运费。".to_string(),
        ];
        let images = vec![
            "nostalgic-welcome-back.jpg".to_string(),
            "exclusive-new-collection.jpg".to_string(),
            "special-offer-banner.jpg".to_string(),
        ];
        return (messages, images);
    }

    if objective.contains("高价值")
        || objective.contains("high value")
        || objective.contains("loyal")
    {
        let messages = vec![
            "感谢您的支持，{name}！下次购买专享 VIP 8 折。".to_string(),
            "{name}，作为我们最重要的客户，邀您抢先体验新品系列！".to_string(),
            "{name}，下单满 5000 即赠精美礼品，感谢一路相伴。".to_string(),
        ];
        let images = vec![
            "luxury-vip-treatment.jpg".to_string(),
            "exclusive-preview-access.jpg".to_string(),
            "premium-gift-offering.jpg".to_string(),
        ];
        return (messages, images);
    }

    let messages = vec![
        "{name}，下一单立享 9 折，优惠码 SAVE10！".to_string(),
        "{name}，为您精选的新品已上架，快来看看吧。".to_string(),
        "专属优惠送给您，{name}！下一单免运费。".to_string(),
    ];
    let images = vec![
        "seasonal-discount-offer.jpg".to_string(),
        "new-arrivals-showcase.jpg".to_string(),
        "free-shipping-promotion.jpg".to_string(),
    ];
    (messages, images)
}

/// 活动执行时使用的兜底文案
pub fn default_campaign_message(campaign_id: &str) -> String {
    let code_suffix: String = campaign_id.chars().take(4).collect();
    format!(
        "{{name}}，下一单立享 9 折！优惠码 CAMPAIGN{}",
        code_suffix.to_uppercase()
    )
}

/// 渲染个性化文案，替换 `{name}` 占位符
pub fn personalize(template: &str, customer_name: &str) -> String {
    template.replace("{name}", customer_name)
}

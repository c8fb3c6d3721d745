//! Submissions collected by a form and the analysis figures derived from them.

use log::*;

/// Defines submission data structure.
///
/// `form_data` keeps the answers in form order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Submission {
    pub id: String,
    pub form_name: String,
    pub submit_time: String,
    pub channel_name: String,
    pub form_data: Vec<(String, String)>,
}

impl Submission {
    pub fn answer(&self, header: &str) -> &str {
        self.form_data
            .iter()
            .find(|(key, _)| key == header)
            .map(|(_, value)| value.as_str())
            .unwrap_or("")
    }
}

/// Filter applied to the submission table.
///
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SubmissionFilter {
    pub channel: Option<String>,
}

impl SubmissionFilter {
    pub fn matches(&self, submission: &Submission) -> bool {
        match &self.channel {
            Some(channel) => submission.channel_name == *channel,
            None => true,
        }
    }
}

/// One page of the filtered submission table.
///
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SubmissionPage {
    pub rows: Vec<Submission>,
    pub total: usize,
    pub page: usize,
    pub page_count: usize,
}

/// Headline analysis figures.
///
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AnalysisMetrics {
    pub recovery: u32,
    pub views: u32,
    pub avg_time: String,
    pub completion_rate: String,
}

/// A named distribution rendered as a bar chart.
///
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Breakdown {
    pub title: String,
    pub items: Vec<(String, u64)>,
}

/// Closing report of a collection round: overview figures and conclusions.
///
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AnalysisReport {
    pub form_title: String,
    pub generated_on: String,
    pub metrics: AnalysisMetrics,
    pub conclusions: Vec<String>,
}

/// Largest entry of a breakdown and its share in percent.
///
fn leading_item(breakdown: &Breakdown) -> Option<(&str, u64)> {
    let total: u64 = breakdown.items.iter().map(|(_, v)| *v).sum();
    if total == 0 {
        return None;
    }
    breakdown
        .items
        .iter()
        .max_by_key(|(_, value)| *value)
        .map(|(name, value)| (name.as_str(), value * 100 / total))
}

/// Oversees the submissions of the analysed form.
///
#[derive(Clone, Debug)]
pub struct SubmissionStore {
    submissions: Vec<Submission>,
}

impl Default for SubmissionStore {
    fn default() -> Self {
        SubmissionStore::seeded()
    }
}

fn breakdown(title: &str, items: &[(&str, u64)]) -> Breakdown {
    Breakdown {
        title: title.to_string(),
        items: items.iter().map(|(name, value)| (name.to_string(), *value)).collect(),
    }
}

impl SubmissionStore {
    pub fn new(submissions: Vec<Submission>) -> Self {
        SubmissionStore { submissions }
    }

    pub fn seeded() -> Self {
        let submission = |id: &str, channel: &str, time: &str, answers: [&str; 6]| {
            let headers = ["姓名", "性别", "学院", "申请类型", "申请金额", "备注"];
            Submission {
                id: id.to_string(),
                form_name: "秋季助学金申请表".to_string(),
                submit_time: time.to_string(),
                channel_name: channel.to_string(),
                form_data: headers
                    .iter()
                    .zip(answers.iter())
                    .map(|(h, a)| (h.to_string(), a.to_string()))
                    .collect(),
            }
        };
        SubmissionStore::new(vec![
            submission("S20231024001", "申领项目表单 (App端)", "2023-10-24 14:30",
                ["王晓明", "男", "计算机学院", "一等助学金", "5,000", "家庭经济困难，需申请补助"]),
            submission("S20231024002", "A栋大厅海报", "2023-10-24 14:45",
                ["李芸", "女", "经管学院", "二等助学金", "3,000", "单亲家庭"]),
            submission("S20231024003", "食堂宣传单", "2023-10-24 15:10",
                ["张伟", "男", "机械学院", "三等助学金", "2,000", ""]),
            submission("S20231024004", "申领项目表单 (App端)", "2023-10-24 16:00",
                ["赵丽", "女", "外语学院", "一等助学金", "5,000", "建档立卡户"]),
            submission("S20231024005", "线下录入", "2023-10-24 16:20",
                ["孙强", "男", "体育学院", "临时困难补助", "1,000", "突发疾病"]),
            submission("S20231025001", "调查问卷 (公共链接)", "2023-10-25 09:10",
                ["陈静", "女", "艺术学院", "二等助学金", "3,000", ""]),
        ])
    }

    pub fn len(&self) -> usize {
        self.submissions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.submissions.is_empty()
    }

    /// Return one page of the filtered submissions. Pages are 1-based; a
    /// page past the end is clamped to the last page.
    ///
    pub fn list_submissions(
        &self,
        filter: &SubmissionFilter,
        page: usize,
        page_size: usize,
    ) -> SubmissionPage {
        let page_size = page_size.max(1);
        let matching: Vec<&Submission> =
            self.submissions.iter().filter(|s| filter.matches(s)).collect();
        let total = matching.len();
        let page_count = ((total + page_size - 1) / page_size).max(1);
        let page = page.clamp(1, page_count);
        let rows = matching
            .into_iter()
            .skip((page - 1) * page_size)
            .take(page_size)
            .cloned()
            .collect();
        SubmissionPage {
            rows,
            total,
            page,
            page_count,
        }
    }

    /// Column headers, in the order of the first submission's answers.
    ///
    pub fn headers(&self) -> Vec<String> {
        self.submissions
            .first()
            .map(|s| s.form_data.iter().map(|(key, _)| key.clone()).collect())
            .unwrap_or_default()
    }

    /// Distinct channel names in first-seen order.
    ///
    pub fn channel_names(&self) -> Vec<String> {
        let mut names: Vec<String> = vec![];
        for submission in &self.submissions {
            if !names.contains(&submission.channel_name) {
                names.push(submission.channel_name.clone());
            }
        }
        names
    }

    /// Delete the given submissions. Returns how many were removed.
    ///
    pub fn delete_submissions(&mut self, ids: &[String]) -> usize {
        let before = self.submissions.len();
        self.submissions.retain(|s| !ids.contains(&s.id));
        let removed = before - self.submissions.len();
        info!("Deleted {} submission(s)", removed);
        removed
    }

    pub fn analysis_metrics(&self) -> AnalysisMetrics {
        AnalysisMetrics {
            recovery: 1205,
            views: 3580,
            avg_time: "3分24秒".to_string(),
            completion_rate: "33.6%".to_string(),
        }
    }

    /// Build the closing report for a form.
    ///
    pub fn report(&self, form_title: &str, generated_on: String) -> AnalysisReport {
        let metrics = self.analysis_metrics();
        let mut conclusions = vec![format!(
            "访问量达到 {}，实际回收 {}。",
            metrics.views, metrics.recovery
        )];
        let breakdowns = self.breakdowns();
        let find = |title: &str| breakdowns.iter().find(|b| b.title == title);
        if let Some((device, share)) = find("设备").and_then(leading_item) {
            conclusions.push(format!(
                "绝大多数用户（{}%）使用{}访问，建议优化该端展示体验。",
                share, device
            ));
        }
        if let Some((region, _)) = find("地域").and_then(leading_item) {
            conclusions.push(format!("地域分布上，{}地区参与度最高。", region));
        }
        info!("Generated analysis report for '{}'", form_title);
        AnalysisReport {
            form_title: form_title.to_string(),
            generated_on,
            metrics,
            conclusions,
        }
    }

    /// Daily submission counts.
    ///
    pub fn trend(&self) -> Vec<(String, u64)> {
        [
            ("11-01", 12u64),
            ("11-03", 18),
            ("11-05", 8),
            ("11-07", 25),
            ("11-09", 14),
            ("11-11", 32),
            ("11-13", 20),
            ("11-15", 45),
            ("11-17", 28),
            ("11-19", 50),
            ("11-21", 35),
            ("11-23", 15),
            ("11-25", 42),
            ("11-27", 24),
            ("11-29", 38),
        ]
        .iter()
        .map(|(date, value)| (date.to_string(), *value))
        .collect()
    }

    /// Visitor distributions by region, device, operating system and source.
    ///
    pub fn breakdowns(&self) -> Vec<Breakdown> {
        vec![
            breakdown("地域", &[("北京", 420), ("上海", 310), ("广东", 280), ("江苏", 150), ("浙江", 45)]),
            breakdown("设备", &[("桌面设备", 93), ("移动设备", 7)]),
            breakdown(
                "操作系统",
                &[("Windows", 84), ("Mac OS", 3), ("Android", 6), ("iOS", 1), ("其他", 6)],
            ),
            breakdown("来源", &[("其他", 59), ("微信", 41)]),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_headers_and_channels() {
        let store = SubmissionStore::seeded();
        assert_eq!(
            store.headers(),
            vec!["姓名", "性别", "学院", "申请类型", "申请金额", "备注"]
        );
        let channels = store.channel_names();
        assert_eq!(channels.len(), 5);
        assert_eq!(channels[0], "申领项目表单 (App端)");
    }

    #[test]
    fn test_filter_and_paginate() {
        let store = SubmissionStore::seeded();
        let all = store.list_submissions(&SubmissionFilter::default(), 1, 4);
        assert_eq!(all.total, 6);
        assert_eq!(all.rows.len(), 4);
        assert_eq!(all.page_count, 2);

        let second = store.list_submissions(&SubmissionFilter::default(), 9, 4);
        assert_eq!(second.page, 2);
        assert_eq!(second.rows.len(), 2);

        let filter = SubmissionFilter {
            channel: Some("申领项目表单 (App端)".to_string()),
        };
        let app = store.list_submissions(&filter, 1, 20);
        assert_eq!(app.total, 2);
        assert_eq!(app.rows[1].answer("姓名"), "赵丽");
    }

    #[test]
    fn test_report_conclusions() {
        let store = SubmissionStore::seeded();
        let report = store.report("秋季助学金申请表", "2023-11-30".to_string());
        assert_eq!(report.form_title, "秋季助学金申请表");
        assert_eq!(report.metrics.recovery, 1205);
        assert_eq!(report.conclusions.len(), 3);
        assert!(report.conclusions[0].contains("3580"));
        assert!(report.conclusions[1].contains("93%"));
        assert!(report.conclusions[1].contains("桌面设备"));
        assert!(report.conclusions[2].contains("北京"));
    }

    #[test]
    fn test_empty_page() {
        let store = SubmissionStore::new(vec![]);
        let page = store.list_submissions(&SubmissionFilter::default(), 3, 20);
        assert_eq!(page.page, 1);
        assert_eq!(page.page_count, 1);
        assert!(page.rows.is_empty());
        assert!(store.headers().is_empty());
    }

    #[test]
    fn test_delete_submissions() {
        let mut store = SubmissionStore::seeded();
        let removed = store.delete_submissions(&[
            "S20231024001".to_string(),
            "S20231025001".to_string(),
            "missing".to_string(),
        ]);
        assert_eq!(removed, 2);
        assert_eq!(store.len(), 4);
    }

    #[test]
    fn test_analysis_figures() {
        let store = SubmissionStore::seeded();
        assert_eq!(store.analysis_metrics().recovery, 1205);
        assert_eq!(store.trend().len(), 15);
        assert_eq!(store.breakdowns().len(), 4);
    }
}

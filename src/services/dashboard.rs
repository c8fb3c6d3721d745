//! Figures shown on the dashboard.

/// Direction of a metric change.
///
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Trend {
    Up,
    Down,
    Neutral,
}

/// Defines dashboard metric card data structure.
///
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DashboardStat {
    pub title: String,
    pub value: String,
    pub change: String,
    pub trend: Trend,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TaskStatus {
    Pending,
    Reviewing,
}

impl TaskStatus {
    pub fn label(&self) -> &'static str {
        match self {
            TaskStatus::Pending => "Pending",
            TaskStatus::Reviewing => "Reviewing",
        }
    }
}

/// Defines pending review task data structure.
///
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PendingTask {
    pub id: String,
    pub project: String,
    pub applicant: String,
    pub amount: String,
    pub date: String,
    pub status: TaskStatus,
    pub risk_score: u8,
}

impl PendingTask {
    /// Scores above 80 are flagged as high risk.
    ///
    pub fn is_high_risk(&self) -> bool {
        self.risk_score > 80
    }
}

/// Houses the dashboard figures.
///
#[derive(Clone, Debug)]
pub struct Dashboard {
    stats: Vec<DashboardStat>,
    tasks: Vec<PendingTask>,
    categories: Vec<(String, u64)>,
    weekly: Vec<(String, u64, u64)>,
}

impl Default for Dashboard {
    fn default() -> Self {
        Dashboard::seeded()
    }
}

impl Dashboard {
    pub fn seeded() -> Self {
        let stat = |title: &str, value: &str, change: &str, trend| DashboardStat {
            title: title.to_string(),
            value: value.to_string(),
            change: change.to_string(),
            trend,
        };
        let task = |id: &str, project: &str, applicant: &str, amount: &str, date: &str, status, risk_score| {
            PendingTask {
                id: id.to_string(),
                project: project.to_string(),
                applicant: applicant.to_string(),
                amount: amount.to_string(),
                date: date.to_string(),
                status,
                risk_score,
            }
        };
        Dashboard {
            stats: vec![
                stat("今日申报总数", "248", "+12.5%", Trend::Up),
                stat("待办审核任务", "45", "-5.0%", Trend::Down),
                stat("累计发放金额(万元)", "8,920", "+2.1%", Trend::Up),
                stat("AI 智能拦截异常", "12", "+8.3%", Trend::Up),
            ],
            tasks: vec![
                task("T-2024001", "秋季助学金申请", "张三", "5,000", "2023-10-24 10:30", TaskStatus::Pending, 12),
                task("T-2024002", "临时医疗救助", "李四", "2,000", "2023-10-24 11:15", TaskStatus::Pending, 88),
                task("T-2024003", "困难家庭物资包", "王五", "800", "2023-10-24 14:20", TaskStatus::Reviewing, 5),
                task("T-2024004", "创业补贴申请", "赵六", "10,000", "2023-10-24 15:45", TaskStatus::Pending, 45),
                task("T-2024005", "高龄津贴", "孙七", "300", "2023-10-24 16:00", TaskStatus::Reviewing, 2),
            ],
            categories: [("助学类", 400u64), ("大病救助", 300), ("物资发放", 300), ("综合帮扶", 200)]
                .iter()
                .map(|(name, value)| (name.to_string(), *value))
                .collect(),
            weekly: [
                ("周一", 120u64, 110u64),
                ("周二", 132, 125),
                ("周三", 101, 98),
                ("周四", 134, 130),
                ("周五", 190, 170),
                ("周六", 230, 210),
                ("周日", 210, 200),
            ]
            .iter()
            .map(|(day, applied, reviewed)| (day.to_string(), *applied, *reviewed))
            .collect(),
        }
    }

    pub fn list_dashboard_metrics(&self) -> &[DashboardStat] {
        &self.stats
    }

    pub fn pending_tasks(&self) -> &[PendingTask] {
        &self.tasks
    }

    pub fn category_breakdown(&self) -> &[(String, u64)] {
        &self.categories
    }

    /// Applications and reviews per weekday.
    ///
    pub fn weekly_trend(&self) -> &[(String, u64, u64)] {
        &self.weekly
    }
}

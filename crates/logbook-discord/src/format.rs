//! Reply formatting. Every ledger-backed reply is built here so the handler
//! stays a thin gate-and-dispatch layer and the exact text is unit-testable.

use chrono::{DateTime, Utc};
use chrono_tz::Tz;

use logbook_duty::types::DutyRecord;

/// Wrap a reply in a Discord code block.
pub fn code_block(body: &str) -> String {
    format!("```{}```", body)
}

/// 12-hour clock in the display timezone, e.g. `06:15:09 PM`.
pub fn time12(at: DateTime<Utc>, tz: Tz) -> String {
    at.with_timezone(&tz).format("%I:%M:%S %p").to_string()
}

/// `MM/DD/YYYY` in the display timezone.
pub fn date_mdy(at: DateTime<Utc>, tz: Tz) -> String {
    at.with_timezone(&tz).format("%m/%d/%Y").to_string()
}

/// Split a minute total into whole hours and leftover minutes.
pub fn hours_minutes(total_minutes: i64) -> (i64, i64) {
    (total_minutes / 60, total_minutes % 60)
}

pub fn status_reply(open_minutes: Option<i64>, week_total: i64) -> String {
    let (h, m) = hours_minutes(week_total);
    match open_minutes {
        None => code_block(&format!(
            "> YOU ARE CURRENTLY NOT WORKING OR CLOCKED-IN.\n+ YOUR WEEK TOTAL: {} HOURS {} MINUTES",
            h, m
        )),
        Some(mins) => code_block(&format!(
            "> YOU ARE CURRENTLY CLOCKED-IN.\n+ CURRENT DUTY: {} minutes\n+ YOUR WEEK TOTAL: {} HOURS {} MINUTES",
            mins, h, m
        )),
    }
}

pub fn clock_in_reply(name: &str, at: DateTime<Utc>, tz: Tz) -> String {
    code_block(&format!("{} CLOCKED IN\n{}", name, time12(at, tz)))
}

pub fn clock_out_reply(name: &str, record: &DutyRecord) -> String {
    let (h, m) = hours_minutes(record.duration_minutes());
    code_block(&format!(
        "{} CLOCKED OUT\nDUTY ID: {}\nTOTAL: {} HOURS {} MINUTES",
        name, record.duty_id, h, m
    ))
}

pub fn force_clock_in_reply(name: &str, actor: &str, at: DateTime<Utc>, tz: Tz) -> String {
    code_block(&format!(
        "{} FORCE CLOCKED IN\nBy {}\n{}",
        name,
        actor,
        time12(at, tz)
    ))
}

pub fn force_clock_out_reply(name: &str, actor: &str, record: &DutyRecord) -> String {
    let (h, m) = hours_minutes(record.duration_minutes());
    code_block(&format!(
        "{} FORCE CLOCKED OUT\nBy {}\nDUTY ID: {}\nTOTAL: {} HOURS {} MINUTES",
        name, actor, record.duty_id, h, m
    ))
}

/// One user's section of the weekly report.
pub fn report_block(name: &str, user_id: u64, records: &[DutyRecord], tz: Tz) -> String {
    let total: i64 = records.iter().map(|r| r.duration_minutes()).sum();
    let (h, m) = hours_minutes(total);

    let lines: Vec<String> = records
        .iter()
        .map(|r| {
            format!(
                "- Duty ID {} : {} mins Date: {}",
                r.duty_id,
                r.duration_minutes(),
                date_mdy(r.end, tz)
            )
        })
        .collect();

    code_block(&format!(
        "{} ({})\n> TOTAL TIME (WEEK): {:02} HOURS {:02} MINUTES\nDUTIES:\n{}",
        name,
        user_id,
        h,
        m,
        lines.join("\n")
    ))
}

/// Full-history report for one user.
pub fn single_report_block(name: &str, user_id: u64, records: &[DutyRecord], tz: Tz) -> String {
    let blocks: Vec<String> = records
        .iter()
        .map(|r| {
            format!(
                "DUTY ID: {}\nTOTAL: {} minutes\nDATE: {}",
                r.duty_id,
                r.duration_minutes(),
                date_mdy(r.end, tz)
            )
        })
        .collect();

    code_block(&format!("{} ({})\n\n{}", name, user_id, blocks.join("\n\n")))
}

pub fn admin_list_reply(names: &[String]) -> String {
    let body = if names.is_empty() {
        "None".to_string()
    } else {
        names.join("\n")
    };
    code_block(&format!("Admins:\n{}", body))
}

pub fn help_text(prefix: &str) -> String {
    code_block(&format!(
        "EMS13 HR MANAGEMENT\n\n\
         GENERAL\n{p}help\n{p}id\n{p}setnickname NAME\n\n\
         LOGBOOK\n{p}clockin\n{p}clockout\n{p}status\n\
         {p}override clockin|clockout ID\n\n\
         REPORTS (ADMIN)\n{p}report\n{p}singlereport ID\n{p}void ID DUTYID\n\n\
         ADMIN CHANNEL\n{p}admin\n{p}addadmin ID\n{p}removeadmin ID\n\
         {p}employee delete ID",
        p = prefix
    ))
}

pub fn override_usage(prefix: &str) -> String {
    code_block(&format!("{p}override clockin|clockout ID", p = prefix))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    const MANILA: Tz = chrono_tz::Asia::Manila;

    fn record(minutes: i64) -> DutyRecord {
        // 2025-06-02 00:00 UTC = 08:00 Manila.
        let start = Utc.with_ymd_and_hms(2025, 6, 2, 0, 0, 0).unwrap();
        DutyRecord {
            duty_id: "4321".to_string(),
            start,
            end: start + Duration::minutes(minutes),
        }
    }

    #[test]
    fn time_renders_in_display_timezone() {
        let at = Utc.with_ymd_and_hms(2025, 6, 2, 10, 5, 9).unwrap();
        // 10:05:09 UTC = 18:05:09 Manila.
        assert_eq!(time12(at, MANILA), "06:05:09 PM");
        assert_eq!(date_mdy(at, MANILA), "06/02/2025");
    }

    #[test]
    fn hours_minutes_divmod() {
        assert_eq!(hours_minutes(0), (0, 0));
        assert_eq!(hours_minutes(59), (0, 59));
        assert_eq!(hours_minutes(90), (1, 30));
        assert_eq!(hours_minutes(600), (10, 0));
    }

    #[test]
    fn status_reply_off_duty() {
        let text = status_reply(None, 90);
        assert!(text.contains("NOT WORKING"));
        assert!(text.contains("1 HOURS 30 MINUTES"));
    }

    #[test]
    fn status_reply_on_duty_includes_current_duty() {
        let text = status_reply(Some(25), 135);
        assert!(text.contains("CURRENTLY CLOCKED-IN"));
        assert!(text.contains("CURRENT DUTY: 25 minutes"));
        assert!(text.contains("2 HOURS 15 MINUTES"));
    }

    #[test]
    fn clock_out_reply_shows_duty_id_and_total() {
        let text = clock_out_reply("Alice", &record(90));
        assert_eq!(
            text,
            "```Alice CLOCKED OUT\nDUTY ID: 4321\nTOTAL: 1 HOURS 30 MINUTES```"
        );
    }

    #[test]
    fn force_replies_name_the_actor() {
        let r = record(60);
        let text = force_clock_out_reply("Bob", "Alice", &r);
        assert!(text.contains("Bob FORCE CLOCKED OUT"));
        assert!(text.contains("By Alice"));

        let text = force_clock_in_reply("Bob", "Alice", r.start, MANILA);
        assert!(text.contains("Bob FORCE CLOCKED IN"));
        assert!(text.contains("By Alice"));
        assert!(text.contains("08:00:00 AM"));
    }

    #[test]
    fn report_block_totals_and_lists() {
        let records = vec![record(30), record(45)];
        let text = report_block("Alice", 42, &records, MANILA);
        assert!(text.contains("Alice (42)"));
        assert!(text.contains("TOTAL TIME (WEEK): 01 HOURS 15 MINUTES"));
        assert!(text.contains("- Duty ID 4321 : 30 mins Date: 06/02/2025"));
        assert!(text.contains("- Duty ID 4321 : 45 mins Date: 06/02/2025"));
    }

    #[test]
    fn single_report_block_lists_all_records() {
        let records = vec![record(10), record(20)];
        let text = single_report_block("Bob", 7, &records, MANILA);
        assert!(text.contains("Bob (7)"));
        assert!(text.contains("TOTAL: 10 minutes"));
        assert!(text.contains("TOTAL: 20 minutes"));
    }

    #[test]
    fn admin_list_handles_empty() {
        assert_eq!(admin_list_reply(&[]), "```Admins:\nNone```");
        let names = vec!["Alice".to_string(), "Bob".to_string()];
        assert_eq!(admin_list_reply(&names), "```Admins:\nAlice\nBob```");
    }

    #[test]
    fn help_uses_configured_prefix() {
        let text = help_text("?");
        assert!(text.contains("?clockin"));
        assert!(text.contains("?employee delete ID"));
        assert!(!text.contains("!clockin"));
    }
}

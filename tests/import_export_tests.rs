use availability_tool::{
    AvailabilityStore, JsonFileStore, PersistenceError, TimeOfDay, WeekSchedule, Weekday,
    WeeklyAvailabilityScheduler, load_schedule_from_csv, load_schedule_from_json,
    save_schedule_to_csv, save_schedule_to_json,
};
use std::fs;
use tempfile::{NamedTempFile, tempdir};

fn t(s: &str) -> TimeOfDay {
    s.parse().unwrap()
}

fn build_sample_week() -> WeekSchedule {
    let mut scheduler = WeeklyAvailabilityScheduler::new();
    scheduler.add_slot(Weekday::Monday, t("09:00"), t("10:00")).unwrap();
    scheduler.add_slot(Weekday::Monday, t("13:00"), t("17:30")).unwrap();
    scheduler.add_slot(Weekday::Wednesday, t("08:00"), t("12:00")).unwrap();
    scheduler.set_day_availability(Weekday::Friday, false);
    scheduler.set_day_availability(Weekday::Sunday, true);
    scheduler.snapshot()
}

#[test]
fn json_round_trip_preserves_week() {
    let week = build_sample_week();
    let file = NamedTempFile::new().unwrap();

    save_schedule_to_json(&week, file.path()).unwrap();
    let loaded = load_schedule_from_json(file.path()).unwrap();

    assert_eq!(loaded, week);
    assert!(!loaded.day(Weekday::Friday).is_available());
    assert!(loaded.day(Weekday::Sunday).is_available());
}

#[test]
fn json_snapshot_is_keyed_by_day_name_monday_first() {
    let week = build_sample_week();
    let file = NamedTempFile::new().unwrap();
    save_schedule_to_json(&week, file.path()).unwrap();

    let raw = fs::read_to_string(file.path()).unwrap();
    let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(value["format_version"], 1);
    assert_eq!(value["week"]["Monday"]["slots"][0]["start"], "09:00");
    assert_eq!(value["week"]["Monday"]["slots"][1]["end"], "17:30");
    assert_eq!(value["week"]["Friday"]["is_available"], false);

    let monday = raw.find("\"Monday\"").unwrap();
    let sunday = raw.find("\"Sunday\"").unwrap();
    assert!(monday < sunday);
}

#[test]
fn json_with_overlapping_slots_is_rejected() {
    let file = NamedTempFile::new().unwrap();
    let day = |slots: &str| format!(r#"{{ "is_available": true, "slots": {slots} }}"#);
    let overlapping = r#"[
        { "id": 1, "start": "09:00", "end": "10:00" },
        { "id": 2, "start": "09:30", "end": "11:00" }
    ]"#;
    let json = format!(
        r#"{{ "format_version": 1, "week": {{
            "Monday": {}, "Tuesday": {}, "Wednesday": {}, "Thursday": {},
            "Friday": {}, "Saturday": {}, "Sunday": {} }} }}"#,
        day(overlapping),
        day("[]"),
        day("[]"),
        day("[]"),
        day("[]"),
        day("[]"),
        day("[]"),
    );
    fs::write(file.path(), json).unwrap();

    let err = load_schedule_from_json(file.path()).unwrap_err();
    assert!(matches!(err, PersistenceError::Serialization(_)));
    assert!(err.to_string().contains("overlap"), "{err}");
}

#[test]
fn json_missing_a_day_or_with_lowercase_key_is_rejected() {
    let file = NamedTempFile::new().unwrap();
    let empty = r#"{ "is_available": true, "slots": [] }"#;
    let missing_sunday = format!(
        r#"{{ "format_version": 1, "week": {{ "Monday": {e}, "Tuesday": {e}, "Wednesday": {e},
            "Thursday": {e}, "Friday": {e}, "Saturday": {e} }} }}"#,
        e = empty
    );
    fs::write(file.path(), missing_sunday).unwrap();
    assert!(load_schedule_from_json(file.path()).is_err());

    let lowercase = format!(
        r#"{{ "format_version": 1, "week": {{ "monday": {e}, "Tuesday": {e}, "Wednesday": {e},
            "Thursday": {e}, "Friday": {e}, "Saturday": {e}, "Sunday": {e} }} }}"#,
        e = empty
    );
    fs::write(file.path(), lowercase).unwrap();
    assert!(load_schedule_from_json(file.path()).is_err());
}

#[test]
fn json_with_slots_on_unavailable_day_is_rejected() {
    let file = NamedTempFile::new().unwrap();
    let e = r#"{ "is_available": true, "slots": [] }"#;
    let off_with_slot =
        r#"{ "is_available": false, "slots": [ { "id": 4, "start": "09:00", "end": "10:00" } ] }"#;
    let json = format!(
        r#"{{ "format_version": 1, "week": {{ "Monday": {e}, "Tuesday": {e}, "Wednesday": {e},
            "Thursday": {e}, "Friday": {e}, "Saturday": {e}, "Sunday": {off_with_slot} }} }}"#
    );
    fs::write(file.path(), json).unwrap();
    let err = load_schedule_from_json(file.path()).unwrap_err();
    assert!(err.to_string().contains("Sunday is unavailable"), "{err}");
}

#[test]
fn unsupported_format_version_is_rejected() {
    let week = build_sample_week();
    let file = NamedTempFile::new().unwrap();
    let body = serde_json::json!({ "format_version": 99, "week": week });
    fs::write(file.path(), body.to_string()).unwrap();
    assert!(matches!(
        load_schedule_from_json(file.path()),
        Err(PersistenceError::InvalidData(_))
    ));
}

#[test]
fn csv_round_trip_preserves_week_including_empty_days() {
    let week = build_sample_week();
    let file = NamedTempFile::new().unwrap();

    save_schedule_to_csv(&week, file.path()).unwrap();
    let loaded = load_schedule_from_csv(file.path()).unwrap();
    assert_eq!(loaded, week);

    let raw = fs::read_to_string(file.path()).unwrap();
    let mut lines = raw.lines();
    assert_eq!(lines.next(), Some("day,is_available,slot_id,start,end"));
    assert!(raw.contains("Monday,true,1,09:00,10:00"));
    assert!(raw.contains("Friday,false,,,"));
    // 3 slot rows + 5 days without slots
    assert_eq!(raw.lines().count(), 1 + 3 + 5);
}

#[test]
fn csv_rows_may_arrive_unsorted() {
    let file = NamedTempFile::new().unwrap();
    let csv = "day,is_available,slot_id,start,end\n\
               Monday,true,2,13:00,14:00\n\
               Monday,true,1,09:00,10:00\n\
               Tuesday,true,,,\n\
               Wednesday,true,,,\n\
               Thursday,true,,,\n\
               Friday,true,,,\n\
               Saturday,false,,,\n\
               Sunday,false,,,\n";
    fs::write(file.path(), csv).unwrap();
    let week = load_schedule_from_csv(file.path()).unwrap();
    let starts: Vec<String> = week
        .day(Weekday::Monday)
        .slots()
        .iter()
        .map(|slot| slot.start.to_string())
        .collect();
    assert_eq!(starts, vec!["09:00", "13:00"]);
    assert!(!week.day(Weekday::Saturday).is_available());
}

#[test]
fn csv_missing_day_or_conflicting_flags_is_rejected() {
    let file = NamedTempFile::new().unwrap();
    fs::write(
        file.path(),
        "day,is_available,slot_id,start,end\nMonday,true,,,\n",
    )
    .unwrap();
    let err = load_schedule_from_csv(file.path()).unwrap_err();
    assert!(err.to_string().contains("no row for Tuesday"), "{err}");

    fs::write(
        file.path(),
        "day,is_available,slot_id,start,end\n\
         Monday,true,1,09:00,10:00\n\
         Monday,false,,,\n",
    )
    .unwrap();
    let err = load_schedule_from_csv(file.path()).unwrap_err();
    assert!(err.to_string().contains("conflicting"), "{err}");
}

#[test]
fn csv_incomplete_slot_row_is_rejected() {
    let file = NamedTempFile::new().unwrap();
    fs::write(
        file.path(),
        "day,is_available,slot_id,start,end\nMonday,true,1,09:00,\n",
    )
    .unwrap();
    assert!(matches!(
        load_schedule_from_csv(file.path()),
        Err(PersistenceError::InvalidData(_))
    ));
}

#[test]
fn saving_again_replaces_the_file_without_leftovers() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("week.json");
    let week = build_sample_week();
    save_schedule_to_json(&week, &path).unwrap();

    // overwriting replaces the whole file and leaves no temporaries behind
    let mut scheduler = WeeklyAvailabilityScheduler::from_snapshot(week);
    scheduler.set_day_availability(Weekday::Monday, false);
    save_schedule_to_json(&scheduler.snapshot(), &path).unwrap();

    let reloaded = load_schedule_from_json(&path).unwrap();
    assert!(!reloaded.day(Weekday::Monday).is_available());
    let entries = fs::read_dir(dir.path()).unwrap().count();
    assert_eq!(entries, 1);
}

#[test]
fn json_file_store_reports_missing_file_as_none() {
    let dir = tempdir().unwrap();
    let store = JsonFileStore::new(dir.path().join("availability.json"));
    assert!(store.load_schedule().unwrap().is_none());

    let week = build_sample_week();
    store.save_schedule(&week).unwrap();
    assert_eq!(store.load_schedule().unwrap(), Some(week));
}

#[test]
fn json_with_slot_id_beyond_the_id_range_is_rejected() {
    let file = NamedTempFile::new().unwrap();
    let e = r#"{ "is_available": true, "slots": [] }"#;
    let huge_id = format!(
        r#"{{ "is_available": true,
            "slots": [ {{ "id": {}, "start": "09:00", "end": "10:00" }} ] }}"#,
        u64::MAX
    );
    let json = format!(
        r#"{{ "format_version": 1, "week": {{ "Monday": {huge_id}, "Tuesday": {e}, "Wednesday": {e},
            "Thursday": {e}, "Friday": {e}, "Saturday": {e}, "Sunday": {e} }} }}"#
    );
    fs::write(file.path(), json).unwrap();

    let err = load_schedule_from_json(file.path()).unwrap_err();
    assert!(err.to_string().contains("exceeds the maximum"), "{err}");
}

#[test]
fn csv_with_slot_id_beyond_the_id_range_is_rejected() {
    let file = NamedTempFile::new().unwrap();
    let csv = format!(
        "day,is_available,slot_id,start,end\n\
         Monday,true,{},09:00,10:00\n\
         Tuesday,true,,,\n\
         Wednesday,true,,,\n\
         Thursday,true,,,\n\
         Friday,true,,,\n\
         Saturday,true,,,\n\
         Sunday,false,,,\n",
        u64::MAX
    );
    fs::write(file.path(), csv).unwrap();
    assert!(matches!(
        load_schedule_from_csv(file.path()),
        Err(PersistenceError::InvalidData(_))
    ));
}

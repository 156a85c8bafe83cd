use competence_core::db::open_db_in_memory;
use competence_core::{
    CompetenceDraft, CompetencePatch, CompetenceRepository, CompetenceService, FailureKind,
    GlobalStatus, RepoError, ServiceEvent, ServiceObserver, SqliteCompetenceRepository,
    SubCompetence,
};
use std::cell::RefCell;
use uuid::Uuid;

fn draft(code: &str, name: &str, subs: Vec<SubCompetence>) -> CompetenceDraft {
    CompetenceDraft::new(code, name, subs)
}

fn one_of_two() -> Vec<SubCompetence> {
    vec![
        SubCompetence::new("A", true),
        SubCompetence::new("B", false),
    ]
}

/// Captures events instead of logging; the observer seam exists so
/// transports can bring their own instrumentation.
#[derive(Default)]
struct CapturingObserver {
    events: RefCell<Vec<ServiceEvent>>,
}

impl ServiceObserver for CapturingObserver {
    fn record(&self, event: &ServiceEvent) {
        self.events.borrow_mut().push(event.clone());
    }
}

#[test]
fn create_then_list_shows_derived_status() {
    let conn = open_db_in_memory().unwrap();
    let service = CompetenceService::new(SqliteCompetenceRepository::new(&conn));

    let created = service.create(draft("C1", "Test", one_of_two())).unwrap();
    // 1 of 2 validated: the tie-friendly non-strict rule applies.
    assert_eq!(created.global_status, GlobalStatus::Validated);

    let listed = service.list().unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].code, "C1");
    assert_eq!(listed[0].global_status, GlobalStatus::Validated);
}

#[test]
fn create_with_empty_subs_fails_before_store_is_touched() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteCompetenceRepository::new(&conn);
    let service = CompetenceService::new(SqliteCompetenceRepository::new(&conn));

    let err = service
        .create(draft("C1", "Test", Vec::new()))
        .unwrap_err();
    assert_eq!(err.kind(), FailureKind::Validation);
    assert!(repo.find().unwrap().is_empty());
}

#[test]
fn create_duplicate_code_maps_to_duplicate_key() {
    let conn = open_db_in_memory().unwrap();
    let service = CompetenceService::new(SqliteCompetenceRepository::new(&conn));

    service.create(draft("C1", "First", one_of_two())).unwrap();
    let err = service
        .create(draft("C1", "Second", one_of_two()))
        .unwrap_err();
    assert_eq!(err.kind(), FailureKind::DuplicateKey);

    let listed = service.list().unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].name, "First");
}

#[test]
fn replace_applies_only_provided_fields_and_recomputes_status() {
    let conn = open_db_in_memory().unwrap();
    let service = CompetenceService::new(SqliteCompetenceRepository::new(&conn));

    let created = service.create(draft("C1", "Old name", one_of_two())).unwrap();

    let updated = service
        .replace(
            created.uuid,
            CompetencePatch {
                name: Some("New name".to_string()),
                ..CompetencePatch::default()
            },
        )
        .unwrap();
    assert_eq!(updated.name, "New name");
    assert_eq!(updated.code, "C1");
    assert_eq!(updated.sub_competences, created.sub_competences);

    let updated = service
        .replace(
            created.uuid,
            CompetencePatch {
                sub_competences: Some(vec![
                    SubCompetence::new("A", false),
                    SubCompetence::new("B", false),
                    SubCompetence::new("C", false),
                ]),
                ..CompetencePatch::default()
            },
        )
        .unwrap();
    assert_eq!(updated.global_status, GlobalStatus::NotValidated);
}

#[test]
fn replace_rejects_patch_that_empties_required_fields() {
    let conn = open_db_in_memory().unwrap();
    let service = CompetenceService::new(SqliteCompetenceRepository::new(&conn));

    let created = service.create(draft("C1", "Test", one_of_two())).unwrap();

    let err = service
        .replace(
            created.uuid,
            CompetencePatch {
                code: Some(String::new()),
                name: Some(String::new()),
                sub_competences: Some(Vec::new()),
            },
        )
        .unwrap_err();
    assert_eq!(err.kind(), FailureKind::Validation);

    // Nothing was persisted; the prior state is fully intact.
    let listed = service.list().unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].code, "C1");
    assert_eq!(listed[0].name, "Test");
    assert_eq!(listed[0].sub_competences, created.sub_competences);
}

#[test]
fn replace_rejects_each_emptied_field_individually() {
    let conn = open_db_in_memory().unwrap();
    let service = CompetenceService::new(SqliteCompetenceRepository::new(&conn));

    let created = service.create(draft("C1", "Test", one_of_two())).unwrap();

    let err = service
        .replace(
            created.uuid,
            CompetencePatch {
                code: Some("  ".to_string()),
                ..CompetencePatch::default()
            },
        )
        .unwrap_err();
    assert!(matches!(err, RepoError::Validation(_)));

    let err = service
        .replace(
            created.uuid,
            CompetencePatch {
                name: Some(String::new()),
                ..CompetencePatch::default()
            },
        )
        .unwrap_err();
    assert!(matches!(err, RepoError::Validation(_)));

    // The full-update path keeps the non-empty guarantee; only the
    // evaluation path (update_sub_items) may empty the sequence.
    let err = service
        .replace(
            created.uuid,
            CompetencePatch {
                sub_competences: Some(Vec::new()),
                ..CompetencePatch::default()
            },
        )
        .unwrap_err();
    assert!(matches!(err, RepoError::Validation(_)));
}

#[test]
fn replace_unknown_id_is_not_found() {
    let conn = open_db_in_memory().unwrap();
    let service = CompetenceService::new(SqliteCompetenceRepository::new(&conn));

    let err = service
        .replace(Uuid::new_v4(), CompetencePatch::default())
        .unwrap_err();
    assert_eq!(err.kind(), FailureKind::NotFound);
}

#[test]
fn update_sub_items_replaces_sequence_wholesale() {
    let conn = open_db_in_memory().unwrap();
    let service = CompetenceService::new(SqliteCompetenceRepository::new(&conn));

    let created = service.create(draft("C1", "Test", one_of_two())).unwrap();
    let updated = service
        .update_sub_items(created.uuid, vec![SubCompetence::new("only", true)])
        .unwrap();

    assert_eq!(updated.sub_competences.len(), 1);
    assert_eq!(updated.sub_competences[0].name, "only");
    assert_eq!(updated.global_status, GlobalStatus::Validated);
}

#[test]
fn update_sub_items_accepts_empty_sequence_unlike_creation() {
    let conn = open_db_in_memory().unwrap();
    let service = CompetenceService::new(SqliteCompetenceRepository::new(&conn));

    let created = service.create(draft("C1", "Test", one_of_two())).unwrap();
    let updated = service.update_sub_items(created.uuid, Vec::new()).unwrap();

    assert!(updated.sub_competences.is_empty());
    assert_eq!(updated.global_status, GlobalStatus::NotValidated);
}

#[test]
fn update_sub_items_unknown_id_mutates_nothing() {
    let conn = open_db_in_memory().unwrap();
    let service = CompetenceService::new(SqliteCompetenceRepository::new(&conn));

    let created = service.create(draft("C1", "Test", one_of_two())).unwrap();
    let err = service
        .update_sub_items(Uuid::new_v4(), vec![SubCompetence::new("X", true)])
        .unwrap_err();
    assert!(matches!(err, RepoError::NotFound(_)));

    let listed = service.list().unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].sub_competences, created.sub_competences);
}

#[test]
fn remove_deletes_record_and_reports_missing_ids() {
    let conn = open_db_in_memory().unwrap();
    let service = CompetenceService::new(SqliteCompetenceRepository::new(&conn));

    let created = service.create(draft("C1", "Test", one_of_two())).unwrap();
    let removed = service.remove(created.uuid).unwrap();
    assert_eq!(removed.uuid, created.uuid);
    assert!(service.list().unwrap().is_empty());

    let err = service.remove(created.uuid).unwrap_err();
    assert_eq!(err.kind(), FailureKind::NotFound);
}

#[test]
fn list_recomputes_status_over_stale_cached_value() {
    let conn = open_db_in_memory().unwrap();
    let service = CompetenceService::new(SqliteCompetenceRepository::new(&conn));

    let created = service.create(draft("C1", "Test", one_of_two())).unwrap();

    // Simulate a divergent client-computed status persisted by an older
    // write path; reads must derive from sub-competences, not trust it.
    conn.execute(
        "UPDATE competences SET global_status = 'not validated' WHERE uuid = ?1;",
        [created.uuid.to_string()],
    )
    .unwrap();

    let listed = service.list().unwrap();
    assert_eq!(listed[0].global_status, GlobalStatus::Validated);
}

#[test]
fn end_to_end_toggle_flips_global_status() {
    let conn = open_db_in_memory().unwrap();
    let service = CompetenceService::new(SqliteCompetenceRepository::new(&conn));

    let created = service.create(draft("C1", "Test", one_of_two())).unwrap();
    let listed = service.list().unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].global_status, GlobalStatus::Validated);

    // Toggle "A" off: 0 of 2 validated.
    let toggled = competence_core::toggle_sub_competence(&listed[0].sub_competences, 0).unwrap();
    let updated = service.update_sub_items(created.uuid, toggled).unwrap();
    assert_eq!(updated.global_status, GlobalStatus::NotValidated);
}

#[test]
fn observer_receives_outcome_per_operation() {
    let conn = open_db_in_memory().unwrap();
    let observer = CapturingObserver::default();
    let service =
        CompetenceService::with_observer(SqliteCompetenceRepository::new(&conn), &observer);

    let created = service.create(draft("C1", "Test", one_of_two())).unwrap();
    let _ = service.create(draft("C1", "Dup", one_of_two()));
    service.remove(created.uuid).unwrap();
    let _ = service.remove(created.uuid);

    let events = observer.events.borrow();
    let outcomes: Vec<(&str, &str)> = events
        .iter()
        .map(|event| (event.operation, event.outcome))
        .collect();
    assert_eq!(
        outcomes,
        vec![
            ("create", "ok"),
            ("create", "duplicate_key"),
            ("remove", "ok"),
            ("remove", "not_found"),
        ]
    );
}

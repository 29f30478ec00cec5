//! Integration tests for the automation repositories.
//!
//! Exercises the repository layer against a real database:
//! - Trigger and rule CRUD, including clearing nullable columns
//! - Priority append on create and transactional reorder
//! - Organization scoping
//! - Lead writes respecting the substatus-only-when-hot constraint
//!
//! Each test gets a fresh database from `DATABASE_URL`.

use chrono::{Duration, Utc};
use odonto_core::interest::condition::{ConditionField, ConditionOperator};
use odonto_core::interest::trigger::{InterestTrigger, TriggerActions};
use odonto_core::lead::{HotSubstatus, LeadState, Temperature};
use odonto_core::transition::rule::{TemperatureTransitionRule, TransitionAction, TriggerEvent};
use odonto_db::models::lead::CreateLead;
use odonto_db::models::organization::CreateOrganization;
use odonto_db::repositories::{
    InterestTriggerRepo, LeadRepo, OrganizationRepo, TransitionRuleRepo,
};
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn new_org(pool: &PgPool, name: &str) -> i64 {
    OrganizationRepo::create(
        pool,
        &CreateOrganization {
            name: name.to_string(),
        },
    )
    .await
    .unwrap()
    .id
}

fn new_trigger(name: &str, value: &str) -> InterestTrigger {
    InterestTrigger {
        id: 0,
        name: name.to_string(),
        priority: 0,
        active: true,
        condition_field: ConditionField::FirstMessage,
        condition_operator: ConditionOperator::Contains,
        condition_value: value.to_string(),
        case_sensitive: false,
        actions: TriggerActions {
            set_temperature: Some(Temperature::Quente),
            ..Default::default()
        },
    }
}

fn new_rule(name: &str) -> TemperatureTransitionRule {
    TemperatureTransitionRule {
        id: 0,
        name: name.to_string(),
        active: true,
        priority: 0,
        trigger_event: TriggerEvent::InactivityTimer,
        from_temperature: Some(Temperature::Novo),
        from_substatus: None,
        timer_minutes: 1440,
        action: TransitionAction {
            set_temperature: Some(Temperature::Frio),
            clear_substatus: false,
            set_substatus: None,
        },
    }
}

fn new_lead(name: &str, temperature: Temperature) -> CreateLead {
    CreateLead {
        name: name.to_string(),
        phone: None,
        temperature: Some(temperature),
        status: None,
        last_interaction_at: None,
    }
}

// ---------------------------------------------------------------------------
// Interest triggers
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn trigger_create_appends_priority(pool: PgPool) {
    let org = new_org(&pool, "Clínica Sorriso").await;

    let first = InterestTriggerRepo::create(&pool, org, &new_trigger("a", "a"), None)
        .await
        .unwrap();
    let second = InterestTriggerRepo::create(&pool, org, &new_trigger("b", "b"), None)
        .await
        .unwrap();
    let pinned = InterestTriggerRepo::create(&pool, org, &new_trigger("c", "c"), Some(10))
        .await
        .unwrap();

    assert_eq!(first.priority, 0);
    assert_eq!(second.priority, 1);
    assert_eq!(pinned.priority, 10);

    let core = first.into_core().unwrap();
    assert_eq!(core.actions.set_temperature, Some(Temperature::Quente));
    assert_eq!(core.condition_operator, ConditionOperator::Contains);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn trigger_update_clears_nullable_action(pool: PgPool) {
    let org = new_org(&pool, "Clínica").await;
    let row = InterestTriggerRepo::create(&pool, org, &new_trigger("a", "a"), None)
        .await
        .unwrap();

    let mut trigger = row.into_core().unwrap();
    trigger.actions.set_temperature = None;
    trigger.actions.set_status = Some("qualificado".into());

    let updated = InterestTriggerRepo::update(&pool, org, &trigger)
        .await
        .unwrap()
        .expect("trigger should exist");
    assert_eq!(updated.action_set_temperature, None);
    assert_eq!(updated.action_set_status.as_deref(), Some("qualificado"));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn trigger_list_respects_activity_and_order(pool: PgPool) {
    let org = new_org(&pool, "Clínica").await;
    let mut inactive = new_trigger("inactive", "x");
    inactive.active = false;

    InterestTriggerRepo::create(&pool, org, &new_trigger("late", "x"), Some(5))
        .await
        .unwrap();
    InterestTriggerRepo::create(&pool, org, &inactive, Some(0))
        .await
        .unwrap();
    InterestTriggerRepo::create(&pool, org, &new_trigger("early", "x"), Some(1))
        .await
        .unwrap();

    let active = InterestTriggerRepo::list_active(&pool, org).await.unwrap();
    let names: Vec<_> = active.iter().map(|t| t.name.as_str()).collect();
    assert_eq!(names, vec!["early", "late"]);

    let all = InterestTriggerRepo::list(&pool, org, true).await.unwrap();
    assert_eq!(all.len(), 3);
    assert_eq!(all[0].name, "inactive");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn trigger_reorder_rewrites_priorities(pool: PgPool) {
    let org = new_org(&pool, "Clínica").await;
    let a = InterestTriggerRepo::create(&pool, org, &new_trigger("a", "a"), None)
        .await
        .unwrap();
    let b = InterestTriggerRepo::create(&pool, org, &new_trigger("b", "b"), None)
        .await
        .unwrap();

    InterestTriggerRepo::reorder(&pool, org, &[(b.id, 0), (a.id, 1)])
        .await
        .unwrap();

    let listed = InterestTriggerRepo::list_active(&pool, org).await.unwrap();
    assert_eq!(listed[0].id, b.id);
    assert_eq!(listed[1].id, a.id);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn trigger_queries_are_scoped_by_organization(pool: PgPool) {
    let org_a = new_org(&pool, "A").await;
    let org_b = new_org(&pool, "B").await;
    let row = InterestTriggerRepo::create(&pool, org_a, &new_trigger("a", "a"), None)
        .await
        .unwrap();

    assert!(InterestTriggerRepo::find_by_id(&pool, org_b, row.id)
        .await
        .unwrap()
        .is_none());
    assert!(!InterestTriggerRepo::delete(&pool, org_b, row.id)
        .await
        .unwrap());
    assert!(InterestTriggerRepo::delete(&pool, org_a, row.id)
        .await
        .unwrap());
}

// ---------------------------------------------------------------------------
// Transition rules
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn rule_round_trip_and_reset_to_wildcard(pool: PgPool) {
    let org = new_org(&pool, "Clínica").await;
    let row = TransitionRuleRepo::create(&pool, org, &new_rule("Novo para frio"), None)
        .await
        .unwrap();
    assert_eq!(row.from_temperature.as_deref(), Some("novo"));
    assert_eq!(row.timer_minutes, 1440);

    let mut rule = row.into_core().unwrap();
    rule.from_temperature = None;
    let updated = TransitionRuleRepo::update(&pool, org, &rule)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(updated.from_temperature, None);

    let listed = TransitionRuleRepo::list_active(&pool, org).await.unwrap();
    assert_eq!(listed.len(), 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn rule_timer_check_constraint(pool: PgPool) {
    let org = new_org(&pool, "Clínica").await;
    let mut rule = new_rule("zero");
    rule.timer_minutes = 0;

    let err = TransitionRuleRepo::create(&pool, org, &rule, None)
        .await
        .unwrap_err();
    assert!(err.to_string().contains("ck_transition_rules_timer"));
}

// ---------------------------------------------------------------------------
// Leads
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn lead_apply_state_and_trigger_actions(pool: PgPool) {
    let org = new_org(&pool, "Clínica").await;
    let lead = LeadRepo::create(&pool, org, &new_lead("Maria", Temperature::Novo))
        .await
        .unwrap();
    assert_eq!(lead.temperature, "novo");

    let hot = LeadState {
        temperature: Temperature::Quente,
        substatus: Some(HotSubstatus::EmConversa),
    };
    let lead = LeadRepo::apply_state(&pool, org, lead.id, &hot)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(lead.state().unwrap(), hot);

    // Cooling the lead through a trigger drops the substatus.
    let actions = TriggerActions {
        set_temperature: Some(Temperature::Frio),
        set_interest_id: Some(7),
        ..Default::default()
    };
    let lead = LeadRepo::apply_trigger_actions(&pool, org, lead.id, &actions)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(lead.temperature, "frio");
    assert_eq!(lead.hot_substatus, None);
    assert_eq!(lead.interest_id, Some(7));
    assert_eq!(lead.status, "novo");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn lead_substatus_requires_quente(pool: PgPool) {
    let org = new_org(&pool, "Clínica").await;
    let lead = LeadRepo::create(&pool, org, &new_lead("João", Temperature::Frio))
        .await
        .unwrap();

    let invalid = LeadState {
        temperature: Temperature::Frio,
        substatus: Some(HotSubstatus::AguardandoResposta),
    };
    let err = LeadRepo::apply_state(&pool, org, lead.id, &invalid)
        .await
        .unwrap_err();
    assert!(err.to_string().contains("ck_leads_substatus_only_when_hot"));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn lead_touch_interaction(pool: PgPool) {
    let org = new_org(&pool, "Clínica").await;
    let lead = LeadRepo::create(&pool, org, &new_lead("Ana", Temperature::Novo))
        .await
        .unwrap();
    assert!(lead.last_interaction_at.is_none());

    let at = Utc::now() - Duration::minutes(5);
    let lead = LeadRepo::touch_interaction(&pool, org, lead.id, at)
        .await
        .unwrap()
        .unwrap();
    let stored = lead.last_interaction_at.unwrap();
    assert!((stored - at).num_milliseconds().abs() < 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn lead_writes_in_rolled_back_transaction_are_discarded(pool: PgPool) {
    let org = new_org(&pool, "Clínica").await;
    let lead = LeadRepo::create(&pool, org, &new_lead("Bia", Temperature::Novo))
        .await
        .unwrap();

    let mut tx = pool.begin().await.unwrap();
    let locked = LeadRepo::find_by_id_for_update(&mut *tx, org, lead.id)
        .await
        .unwrap()
        .expect("lead should exist");
    assert_eq!(locked.id, lead.id);

    LeadRepo::touch_interaction(&mut *tx, org, lead.id, Utc::now())
        .await
        .unwrap();
    let actions = TriggerActions {
        set_temperature: Some(Temperature::Quente),
        ..Default::default()
    };
    LeadRepo::apply_trigger_actions(&mut *tx, org, lead.id, &actions)
        .await
        .unwrap();
    tx.rollback().await.unwrap();

    let stored = LeadRepo::find_by_id(&pool, org, lead.id).await.unwrap().unwrap();
    assert_eq!(stored.temperature, "novo");
    assert!(stored.last_interaction_at.is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn lead_row_lock_blocks_concurrent_lockers(pool: PgPool) {
    let org = new_org(&pool, "Clínica").await;
    let lead = LeadRepo::create(&pool, org, &new_lead("Caio", Temperature::Novo))
        .await
        .unwrap();

    let mut holder = pool.begin().await.unwrap();
    LeadRepo::find_by_id_for_update(&mut *holder, org, lead.id)
        .await
        .unwrap()
        .unwrap();

    // A second locker must wait; NOWAIT turns the wait into an error.
    let mut other = pool.begin().await.unwrap();
    let err = sqlx::query("SELECT id FROM leads WHERE id = $1 FOR UPDATE NOWAIT")
        .bind(lead.id)
        .execute(&mut *other)
        .await
        .unwrap_err();
    assert!(err.to_string().contains("could not obtain lock"));

    holder.commit().await.unwrap();
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn health_check_passes(pool: PgPool) {
    odonto_db::health_check(&pool).await.unwrap();
}

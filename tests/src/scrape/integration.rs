#![cfg(test)]
use mcastmap_common::config::{Config, MaddrTable};
use mcastmap_core::report::{self, PortReport};
use mcastmap_core::scraper::{self, ScrapeSummary, SessionStats};
use mcastmap_core::session::{EXIT_COMMAND, MROUTE_COMMAND, SessionKind};
use mcastmap_core::store::FactStore;
use mcastmap_integration_tests::fixtures::{
    Fault, MROUTE_SUBSCRIPTIONS, NEIGHBORS, ScriptedConnector, test_config,
};
use mcastmap_protocols::lldp;

async fn scrape(connector: &ScriptedConnector, cfg: &Config) -> (FactStore, ScrapeSummary) {
    let store: FactStore = FactStore::new();
    let summary: ScrapeSummary = scraper::perform_scrape(connector, &store, cfg).await;
    (store, summary)
}

fn stats(outcome: &Result<SessionStats, impl std::fmt::Debug>) -> SessionStats {
    *outcome.as_ref().expect("session should succeed")
}

/// A full scrape fills both tables and the report joins them per port.
#[tokio::test]
async fn scrape_joins_subscriptions_with_neighbors() {
    let cfg: Config = test_config();
    let connector = ScriptedConnector::new(&cfg);

    let (store, summary) = scrape(&connector, &cfg).await;

    let mroute: SessionStats = stats(&summary.mroute.outcome);
    assert_eq!(mroute.records, MROUTE_SUBSCRIPTIONS);
    assert!(mroute.completed, "routing table should have been read to the end");
    assert_eq!(stats(&summary.lldp.outcome).records, NEIGHBORS.len());
    assert!(!summary.all_failed());

    assert_eq!(store.subscription_count(), MROUTE_SUBSCRIPTIONS);
    assert_eq!(store.neighbor_count(), NEIGHBORS.len());
    assert_eq!(
        store.groups_for_port("Eth1/2"),
        vec!["239.10.10.20/32", "239.10.10.21/32", "239.10.10.23/32"]
    );
    assert_eq!(store.neighbor_for_port("eth1/3").as_deref(), Some("leaf-switch-03"));

    let rows: Vec<PortReport> = report::build(&store);
    let ports: Vec<&str> = rows.iter().map(|row| row.port.as_str()).collect();
    assert_eq!(ports, vec!["Eth1/2", "Eth1/3", "Eth1/7", "Loopback0"]);

    assert_eq!(rows[0].group_count, 3);
    assert_eq!(rows[0].neighbor_label(), "leaf-switch-02");
    assert_eq!(rows[1].group_count, 1);
    assert_eq!(rows[1].neighbor_label(), "leaf-switch-03");
    assert_eq!(rows[2].neighbor, None);
    assert_eq!(rows[2].neighbor_label(), report::NO_NEIGHBOR);

    let total: usize = rows.iter().map(|row| row.group_count).sum();
    assert_eq!(total, MROUTE_SUBSCRIPTIONS);
}

#[tokio::test]
async fn scrape_sends_scripts_in_order() {
    let cfg: Config = test_config();
    let connector = ScriptedConnector::new(&cfg);

    scrape(&connector, &cfg).await;

    assert_eq!(
        connector.sent(SessionKind::Mroute),
        vec![MROUTE_COMMAND.to_string(), EXIT_COMMAND.to_string()]
    );

    let mut expected: Vec<String> = (1..=cfg.lldp_ports)
        .map(|port| lldp::query_command(cfg.lldp_slot, port))
        .collect();
    expected.push(EXIT_COMMAND.to_string());
    assert_eq!(connector.sent(SessionKind::Lldp), expected);
}

/// The switch may split its output anywhere; the result must not depend on where.
#[tokio::test]
async fn scrape_is_independent_of_chunking() {
    let cfg: Config = test_config();
    let (whole, _) = scrape(&ScriptedConnector::new(&cfg), &cfg).await;
    let expected: Vec<PortReport> = report::build(&whole);

    for size in [1, 2, 7, 64] {
        let connector = ScriptedConnector::new(&cfg).with_chunk_size(size);
        let (store, summary) = scrape(&connector, &cfg).await;

        assert!(stats(&summary.mroute.outcome).completed, "chunk size {size}");
        assert_eq!(report::build(&store), expected, "chunk size {size}");
    }
}

#[tokio::test]
async fn scrape_with_legacy_escape_policy() {
    let cfg: Config = Config {
        legacy_escapes: true,
        ..test_config()
    };
    let connector = ScriptedConnector::new(&cfg);

    let (store, summary) = scrape(&connector, &cfg).await;

    // The greeting chunk carries the escapes and is dropped; command output is not.
    assert!(!summary.all_failed());
    assert_eq!(store.subscription_count(), MROUTE_SUBSCRIPTIONS);
    assert_eq!(store.neighbor_count(), NEIGHBORS.len());
}

#[tokio::test]
async fn failed_mroute_session_keeps_lldp_results() {
    let cfg: Config = test_config();
    let connector = ScriptedConnector::new(&cfg).with_fault(SessionKind::Mroute, Fault::RefuseOpen);

    let (store, summary) = scrape(&connector, &cfg).await;

    // The summary carries the failure for the caller to report.
    assert_eq!(summary.mroute.kind, SessionKind::Mroute);
    let error: String = summary.mroute.outcome.as_ref().unwrap_err().to_string();
    assert!(error.contains("channel open refused"), "{error}");
    assert!(!summary.all_failed());
    assert_eq!(store.subscription_count(), 0);
    assert_eq!(store.neighbor_count(), NEIGHBORS.len());
    assert!(report::build(&store).is_empty());
}

#[tokio::test]
async fn transport_failure_keeps_records_already_parsed() {
    let cfg: Config = test_config();
    let connector = ScriptedConnector::new(&cfg)
        .with_chunk_size(40)
        .with_fault(SessionKind::Mroute, Fault::FailAfter(12));

    let (store, summary) = scrape(&connector, &cfg).await;

    assert!(summary.mroute.outcome.is_err());
    let partial: usize = store.subscription_count();
    assert!(partial > 0, "records parsed before the failure should be kept");
    assert!(partial < MROUTE_SUBSCRIPTIONS);
    assert_eq!(stats(&summary.lldp.outcome).records, NEIGHBORS.len());
}

#[tokio::test]
async fn truncated_routing_table_is_reported_incomplete() {
    let cfg: Config = test_config();
    let connector = ScriptedConnector::new(&cfg)
        .with_chunk_size(40)
        .with_fault(SessionKind::Mroute, Fault::CloseAfter(12));

    let (store, summary) = scrape(&connector, &cfg).await;

    let mroute: SessionStats = stats(&summary.mroute.outcome);
    assert!(!mroute.completed);
    assert!(mroute.records < MROUTE_SUBSCRIPTIONS);
    assert_eq!(store.subscription_count(), mroute.records);
}

#[tokio::test]
async fn both_sessions_failing_is_reported() {
    let cfg: Config = test_config();
    let connector = ScriptedConnector::new(&cfg)
        .with_fault(SessionKind::Mroute, Fault::RefuseOpen)
        .with_fault(SessionKind::Lldp, Fault::FailAfter(0));

    let (store, summary) = scrape(&connector, &cfg).await;

    assert!(summary.all_failed());
    assert_eq!(store.subscription_count(), 0);
    assert_eq!(store.neighbor_count(), 0);
}

#[tokio::test]
async fn report_names_groups_from_maddr_table() {
    let cfg: Config = test_config();
    let table: MaddrTable = "ranges = 239.10.10.20,2,Eth1/2; 239.10.10.23,1,Eth1/7\nnames = camera; audio"
        .parse()
        .expect("table should parse");

    let store: FactStore = FactStore::new();
    assert_eq!(store.load_maddr_table(&table).unwrap(), 3);
    // Loading twice adds nothing: first write wins.
    assert_eq!(store.load_maddr_table(&table).unwrap(), 0);
    assert_eq!(store.maddr_count(), 3);

    scraper::perform_scrape(&ScriptedConnector::new(&cfg), &store, &cfg).await;

    let rows: Vec<PortReport> = report::build(&store);
    let names: Vec<(String, Option<String>)> = rows[0]
        .groups
        .iter()
        .map(|entry| (entry.group.clone(), entry.name.clone()))
        .collect();
    assert_eq!(
        names,
        vec![
            ("239.10.10.20/32".to_string(), Some("camera-0".to_string())),
            ("239.10.10.21/32".to_string(), Some("camera-1".to_string())),
            ("239.10.10.23/32".to_string(), Some("audio".to_string())),
        ]
    );
}

//! Membership Module Tests
//!
//! Validates the registry wire protocol, the node table, the liveness sweep,
//! and the gateway-arbitrated election.
//!
//! ## Test Scopes
//! - **Wire protocol**: parse/encode of REGISTER and HEARTBEAT datagrams,
//!   including malformed input.
//! - **Registry**: role assignment on register, unknown-id heartbeats,
//!   liveness edges.
//! - **Election**: single-leader invariant, deterministic lowest-id
//!   promotion, leaderless cluster, demoted nodes rejoining as followers.
//! - **Read routing**: round-robin coverage over the active set.

#[cfg(test)]
mod tests {
    use crate::config::ClusterConfig;
    use crate::membership::election::ElectionCoordinator;
    use crate::membership::registry::NodeRegistry;
    use crate::membership::types::{NodeId, NodeRole, RegistryMessage};
    use std::net::SocketAddr;
    use std::sync::Arc;
    use std::time::Duration;

    /// Config with a heartbeat timeout short enough to age nodes out with a
    /// real sleep.
    fn short_config() -> ClusterConfig {
        ClusterConfig {
            heartbeat_timeout: Duration::from_millis(50),
            sweep_interval: Duration::from_millis(20),
            ..ClusterConfig::default()
        }
    }

    fn addr(port: u16) -> SocketAddr {
        format!("127.0.0.1:{}", port).parse().unwrap()
    }

    async fn register_node(registry: &Arc<NodeRegistry>, id: &str, port: u16) {
        registry
            .register(NodeId(id.to_string()), addr(port), NodeRole::Follower)
            .await;
    }

    // ============================================================
    // WIRE PROTOCOL TESTS
    // ============================================================

    #[test]
    fn test_parse_register() {
        let msg = RegistryMessage::parse("REGISTER;A1;127.0.0.1;5000;LEADER").unwrap();
        assert_eq!(
            msg,
            RegistryMessage::Register {
                id: NodeId("A1".to_string()),
                address: addr(5000),
                role_hint: NodeRole::Leader,
            }
        );
    }

    #[test]
    fn test_parse_heartbeat() {
        let msg = RegistryMessage::parse("HEARTBEAT;A1\n").unwrap();
        assert_eq!(
            msg,
            RegistryMessage::Heartbeat {
                id: NodeId("A1".to_string())
            }
        );
    }

    #[test]
    fn test_parse_unknown_role_hint_degrades_to_follower() {
        let msg = RegistryMessage::parse("REGISTER;A1;127.0.0.1;5000;PRIMARY").unwrap();
        if let RegistryMessage::Register { role_hint, .. } = msg {
            assert_eq!(role_hint, NodeRole::Follower);
        } else {
            panic!("wrong message type");
        }
    }

    #[test]
    fn test_parse_malformed_datagrams() {
        assert!(RegistryMessage::parse("REGISTER;A1;127.0.0.1").is_err());
        assert!(RegistryMessage::parse("REGISTER;A1;nowhere;5000;LEADER").is_err());
        assert!(RegistryMessage::parse("REGISTER;A1;127.0.0.1;banana;LEADER").is_err());
        assert!(RegistryMessage::parse("HEARTBEAT").is_err());
        assert!(RegistryMessage::parse("PING;A1").is_err());
        assert!(RegistryMessage::parse("").is_err());
    }

    #[test]
    fn test_encode_round_trip() {
        let original = RegistryMessage::Register {
            id: NodeId("node-7".to_string()),
            address: addr(5007),
            role_hint: NodeRole::Follower,
        };
        let parsed = RegistryMessage::parse(&original.encode()).unwrap();
        assert_eq!(parsed, original);

        let hb = RegistryMessage::Heartbeat {
            id: NodeId("node-7".to_string()),
        };
        assert_eq!(hb.encode(), "HEARTBEAT;node-7");
    }

    // ============================================================
    // REGISTRY TESTS
    // ============================================================

    #[tokio::test]
    async fn test_first_registered_node_becomes_leader_despite_hint() {
        let registry = NodeRegistry::new(ClusterConfig::default());

        // Hint says follower; the gateway decides otherwise.
        registry
            .register(NodeId("A".to_string()), addr(5000), NodeRole::Follower)
            .await;
        registry
            .register(NodeId("B".to_string()), addr(5001), NodeRole::Leader)
            .await;

        let statuses = registry.snapshot().await;
        assert_eq!(statuses.len(), 2);
        assert_eq!(statuses[0].role, NodeRole::Leader, "first node leads");
        assert_eq!(statuses[1].role, NodeRole::Follower, "hint is advisory");
    }

    #[tokio::test]
    async fn test_reregister_replaces_record_and_keeps_leadership() {
        let registry = NodeRegistry::new(ClusterConfig::default());

        register_node(&registry, "A", 5000).await;
        registry
            .register(NodeId("A".to_string()), addr(5050), NodeRole::Follower)
            .await;

        let statuses = registry.snapshot().await;
        assert_eq!(statuses.len(), 1);
        assert_eq!(statuses[0].address, addr(5050));
        assert_eq!(statuses[0].role, NodeRole::Leader);
    }

    #[tokio::test]
    async fn test_heartbeat_from_unknown_id_creates_nothing() {
        let registry = NodeRegistry::new(ClusterConfig::default());
        register_node(&registry, "A", 5000).await;

        registry.heartbeat(&NodeId("ghost".to_string())).await;

        let statuses = registry.snapshot().await;
        assert_eq!(statuses.len(), 1);
        assert_eq!(statuses[0].id.0, "A");
    }

    #[tokio::test]
    async fn test_liveness_edge() {
        let registry = NodeRegistry::new(short_config());
        register_node(&registry, "A", 5000).await;

        // Fresh registration counts as a heartbeat.
        registry.sweep().await;
        assert!(registry.snapshot().await[0].active);

        tokio::time::sleep(Duration::from_millis(80)).await;
        registry.sweep().await;
        assert!(!registry.snapshot().await[0].active, "stale node goes inactive");

        registry.heartbeat(&NodeId("A".to_string())).await;
        registry.sweep().await;
        assert!(registry.snapshot().await[0].active, "fresh heartbeat revives it");
    }

    // ============================================================
    // ELECTION TESTS
    // ============================================================

    #[tokio::test]
    async fn test_deterministic_reelection_picks_lowest_id() {
        let registry = NodeRegistry::new(short_config());
        let election = ElectionCoordinator::new(registry.clone());

        register_node(&registry, "A", 5000).await; // leader
        register_node(&registry, "D", 5003).await;
        register_node(&registry, "B", 5001).await;
        register_node(&registry, "C", 5002).await;

        // Everyone goes stale, then only the followers come back.
        tokio::time::sleep(Duration::from_millis(80)).await;
        for id in ["B", "C", "D"] {
            registry.heartbeat(&NodeId(id.to_string())).await;
        }

        election.reconcile().await;

        let leader = election.active_leader().await.expect("a leader exists");
        assert_eq!(leader.id.0, "B", "lowest active id wins, regardless of order");
    }

    #[tokio::test]
    async fn test_single_leader_among_active_nodes() {
        let registry = NodeRegistry::new(short_config());
        let election = ElectionCoordinator::new(registry.clone());

        for (id, port) in [("A", 5000), ("B", 5001), ("C", 5002)] {
            register_node(&registry, id, port).await;
        }
        tokio::time::sleep(Duration::from_millis(80)).await;
        registry.heartbeat(&NodeId("C".to_string())).await;
        election.reconcile().await;

        let leaders: Vec<_> = registry
            .snapshot()
            .await
            .into_iter()
            .filter(|s| s.active && s.role == NodeRole::Leader)
            .collect();
        assert_eq!(leaders.len(), 1);
        assert_eq!(leaders[0].id.0, "C");
    }

    #[tokio::test]
    async fn test_leaderless_cluster_when_all_nodes_stale() {
        let registry = NodeRegistry::new(short_config());
        let election = ElectionCoordinator::new(registry.clone());

        register_node(&registry, "A", 5000).await;
        register_node(&registry, "B", 5001).await;
        tokio::time::sleep(Duration::from_millis(80)).await;

        election.reconcile().await;
        assert!(election.active_leader().await.is_none());
    }

    #[tokio::test]
    async fn test_demoted_node_rejoins_as_follower() {
        let registry = NodeRegistry::new(short_config());
        let election = ElectionCoordinator::new(registry.clone());

        register_node(&registry, "A", 5000).await; // initial leader
        register_node(&registry, "B", 5001).await;

        // A dies, B takes over.
        tokio::time::sleep(Duration::from_millis(80)).await;
        registry.heartbeat(&NodeId("B".to_string())).await;
        election.reconcile().await;
        assert_eq!(election.active_leader().await.unwrap().id.0, "B");

        // A comes back: it does not reclaim leadership.
        registry.heartbeat(&NodeId("A".to_string())).await;
        registry.heartbeat(&NodeId("B".to_string())).await;
        election.reconcile().await;

        assert_eq!(election.active_leader().await.unwrap().id.0, "B");
        let a = registry
            .snapshot()
            .await
            .into_iter()
            .find(|s| s.id.0 == "A")
            .unwrap();
        assert!(a.active);
        assert_eq!(a.role, NodeRole::Follower);
    }

    #[tokio::test]
    async fn test_returning_leader_resumes_if_never_demoted() {
        let registry = NodeRegistry::new(short_config());
        let election = ElectionCoordinator::new(registry.clone());

        register_node(&registry, "A", 5000).await;
        tokio::time::sleep(Duration::from_millis(80)).await;

        // A is stale and alone: reconciliation leaves the cluster leaderless
        // but no other node ever got promoted.
        election.reconcile().await;
        assert!(election.active_leader().await.is_none());

        registry.heartbeat(&NodeId("A".to_string())).await;
        election.reconcile().await;
        assert_eq!(election.active_leader().await.unwrap().id.0, "A");
    }

    #[tokio::test]
    async fn test_stale_leader_returning_after_replacement_is_demoted() {
        let registry = NodeRegistry::new(short_config());
        let election = ElectionCoordinator::new(registry.clone());

        // A leads, goes silent, and the cluster reconciles to leaderless.
        register_node(&registry, "A", 5000).await;
        tokio::time::sleep(Duration::from_millis(80)).await;
        election.reconcile().await;
        assert!(election.active_leader().await.is_none());

        // B registers into the leaderless cluster and is promoted.
        register_node(&registry, "B", 5001).await;

        // A heartbeats again while B holds leadership.
        registry.heartbeat(&NodeId("A".to_string())).await;
        registry.heartbeat(&NodeId("B".to_string())).await;
        election.reconcile().await;

        let active_leaders: Vec<_> = registry
            .snapshot()
            .await
            .into_iter()
            .filter(|s| s.active && s.role == NodeRole::Leader)
            .map(|s| s.id.0)
            .collect();
        assert_eq!(active_leaders, vec!["B"], "A must not resurface as a second leader");

        // The demoted node is back in the replication fan-out set.
        let followers: Vec<_> = registry
            .active_followers()
            .await
            .into_iter()
            .map(|r| r.id.0)
            .collect();
        assert_eq!(followers, vec!["A"]);
    }

    // ============================================================
    // READ ROUTING TESTS
    // ============================================================

    #[tokio::test]
    async fn test_round_robin_covers_every_active_node_once() {
        let registry = NodeRegistry::new(ClusterConfig::default());
        for (id, port) in [("C", 5002), ("A", 5000), ("B", 5001)] {
            register_node(&registry, id, port).await;
        }

        let mut visited = Vec::new();
        for _ in 0..3 {
            visited.push(registry.pick_read_node().await.unwrap().id.0);
        }

        // Snapshot order is sorted by id, so a full cycle is A, B, C.
        assert_eq!(visited, vec!["A", "B", "C"]);

        // The next cycle starts over in the same order.
        assert_eq!(registry.pick_read_node().await.unwrap().id.0, "A");
    }

    #[tokio::test]
    async fn test_round_robin_survives_active_set_shrink() {
        let registry = NodeRegistry::new(short_config());
        for (id, port) in [("A", 5000), ("B", 5001), ("C", 5002)] {
            register_node(&registry, id, port).await;
        }

        // Advance the cursor into the three-node cycle.
        registry.pick_read_node().await.unwrap();
        registry.pick_read_node().await.unwrap();

        // Shrink the active set to one node; the cursor keeps counting but
        // never indexes out of range.
        tokio::time::sleep(Duration::from_millis(80)).await;
        registry.heartbeat(&NodeId("B".to_string())).await;
        registry.sweep().await;

        for _ in 0..5 {
            assert_eq!(registry.pick_read_node().await.unwrap().id.0, "B");
        }
    }

    #[tokio::test]
    async fn test_pick_read_node_empty_cluster() {
        let registry = NodeRegistry::new(ClusterConfig::default());
        assert!(registry.pick_read_node().await.is_none());
    }
}

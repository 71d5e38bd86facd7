//! End-to-end delivery semantics of the simulated tunnel: a call pushed
//! through builder -> tunnel -> parser lands on the receiving mock connector
//! with identical arguments, in submission order, under the configured
//! latency and loss.

use glam::{Quat, Vec2, Vec3};

use ticksync_shared::{
    ActionState, DownlinkConnector, EventVariant, LevelObjectId, LocalTunnel, ObjectAnimEvent,
    PacketBuilder, StateUpdate, UplinkConnector, STATE_POSITION, STATE_VISIBILITY,
};
use ticksync_test::{DownlinkCallRecord, RecordingDownlink, RecordingUplink, UplinkCallRecord};

fn make_tunnel() -> LocalTunnel<RecordingUplink, RecordingDownlink> {
    let _ = env_logger::builder().is_test(true).try_init();
    LocalTunnel::new(RecordingUplink::new(), RecordingDownlink::new())
}

#[test]
fn zero_latency_zero_loss_replays_calls_verbatim_in_order() {
    let mut tunnel = make_tunnel();
    let mut client_out = PacketBuilder::new();

    client_out.action_triggered(5, ActionState::Pressed);
    client_out.analog_action_triggered(2, Vec2::new(0.5, -1.0));
    client_out.acknowledge_snapshot(99);
    tunnel.pump_uplink(&mut client_out);

    assert_eq!(
        tunnel.server().calls,
        vec![
            UplinkCallRecord::Action {
                code: 5,
                state: ActionState::Pressed
            },
            UplinkCallRecord::Analog {
                code: 2,
                axes: Vec2::new(0.5, -1.0)
            },
            UplinkCallRecord::Ack { tick: 99 },
        ]
    );
}

#[test]
fn downlink_calls_survive_the_wire_with_identical_arguments() {
    let mut tunnel = make_tunnel();
    let mut server_out = PacketBuilder::new();

    let id = LevelObjectId::new(42);
    let update = StateUpdate {
        flags: STATE_POSITION | STATE_VISIBILITY,
        position: Vec3::new(1.5, -2.0, 3.25),
        rotation: Quat::IDENTITY,
        scale: Vec3::ONE,
        visibility: false,
        running: true,
    };
    let event = EventVariant::ObjectAnim(ObjectAnimEvent {
        object_id: id,
        anim_ref: "anims/walk.anm".to_string(),
        channel: 2,
        speed: 1.5,
    });

    server_out.load_level("levels/arena.lvl");
    server_out.spawn_object(id);
    server_out.object_states_changed(7, id, &update);
    server_out.post_event(1.25, &event);
    server_out.confirm_snapshot(7, 1.25, 1, Some(4));
    tunnel.pump_downlink(&mut server_out);

    assert_eq!(
        tunnel.client().calls,
        vec![
            DownlinkCallRecord::LoadLevel {
                path: "levels/arena.lvl".to_string()
            },
            DownlinkCallRecord::Spawn { id },
            DownlinkCallRecord::StatesChanged { tick: 7, id, update },
            DownlinkCallRecord::Event {
                realtime: 1.25,
                event
            },
            DownlinkCallRecord::Confirm {
                tick: 7,
                realtime: 1.25,
                discrete_change_count: 1,
                reference_tick: Some(4)
            },
        ]
    );
}

#[test]
fn full_loss_delivers_zero_packets() {
    let mut tunnel = make_tunnel();
    tunnel.set_drop_rate(1.0);

    let mut client_out = PacketBuilder::new();
    for code in 0..100 {
        client_out.action_triggered(code, ActionState::Pressed);
    }
    tunnel.pump_uplink(&mut client_out);
    tunnel.step(10.0);

    assert!(tunnel.server().calls.is_empty());
    assert_eq!(tunnel.packets_dropped(), 100);
}

#[test]
fn dropped_packets_never_occupy_a_latency_slot() {
    let mut tunnel = make_tunnel();
    tunnel.set_drop_rate(1.0);
    tunnel.set_latency(1.0);

    let mut client_out = PacketBuilder::new();
    client_out.action_triggered(1, ActionState::Pressed);
    tunnel.pump_uplink(&mut client_out);

    assert_eq!(tunnel.in_flight(), 0);
}

#[test]
fn latency_holds_packets_until_their_timer_expires() {
    let mut tunnel = make_tunnel();
    tunnel.set_latency(0.1);

    let mut client_out = PacketBuilder::new();
    client_out.action_triggered(1, ActionState::Pressed);
    client_out.action_triggered(2, ActionState::Pressed);
    client_out.action_triggered(3, ActionState::Released);
    tunnel.pump_uplink(&mut client_out);

    tunnel.step(0.05);
    assert!(tunnel.server().calls.is_empty());
    assert_eq!(tunnel.in_flight(), 3);

    tunnel.step(0.06);
    let codes: Vec<u32> = tunnel
        .server()
        .calls
        .iter()
        .map(|call| match call {
            UplinkCallRecord::Action { code, .. } => *code,
            other => panic!("unexpected call {other:?}"),
        })
        .collect();
    assert_eq!(codes, vec![1, 2, 3]);
    assert_eq!(tunnel.in_flight(), 0);
}

#[test]
fn per_direction_order_survives_a_latency_change_mid_flight() {
    let mut tunnel = make_tunnel();
    tunnel.set_latency(0.2);

    let mut client_out = PacketBuilder::new();
    client_out.action_triggered(1, ActionState::Pressed);
    tunnel.pump_uplink(&mut client_out);

    // The second packet has the shorter countdown but must not overtake.
    tunnel.set_latency(0.05);
    client_out.action_triggered(2, ActionState::Pressed);
    tunnel.pump_uplink(&mut client_out);

    tunnel.step(0.1);
    assert!(
        tunnel.server().calls.is_empty(),
        "late first packet blocks the direction"
    );

    tunnel.step(0.2);
    let codes: Vec<u32> = tunnel
        .server()
        .calls
        .iter()
        .map(|call| match call {
            UplinkCallRecord::Action { code, .. } => *code,
            other => panic!("unexpected call {other:?}"),
        })
        .collect();
    assert_eq!(codes, vec![1, 2]);
}

#[test]
fn directions_are_independently_ordered() {
    let mut tunnel = make_tunnel();
    tunnel.set_latency(0.1);

    let mut client_out = PacketBuilder::new();
    let mut server_out = PacketBuilder::new();

    client_out.action_triggered(1, ActionState::Pressed);
    tunnel.pump_uplink(&mut client_out);
    server_out.spawn_object(LevelObjectId::new(9));
    tunnel.pump_downlink(&mut server_out);

    tunnel.step(0.2);

    assert_eq!(tunnel.server().calls.len(), 1);
    assert_eq!(tunnel.client().calls.len(), 1);
}

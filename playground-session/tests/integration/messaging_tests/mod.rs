mod test_non_host_never_sends;
mod test_object_state_routing;
mod test_player_state_round_trip;
mod test_transport_events;

mod test_dropped_session_is_noticed;
mod test_stop_hosting_notifies_peers;

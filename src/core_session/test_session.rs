// Session manager behaviour against the in-memory transfer client

#[cfg(test)]
mod tests {
    use crate::core_ftp::mock::MockClient;
    use crate::core_ftp::FtpError;
    use crate::core_session::outcome::{
        ConnectOutcome, DownloadOutcome, LoginOutcome, LogoutOutcome, OperationOutcome,
    };
    use crate::core_session::{Session, TransferSettings};
    use std::path::Path;

    fn settings_in(dir: &Path) -> TransferSettings {
        TransferSettings {
            download_dir: dir.to_path_buf(),
            upload_buffer_size: 16,
            download_buffer_size: 16,
        }
    }

    async fn logged_in_session(settings: TransferSettings) -> Session<MockClient> {
        let mut session = Session::new(MockClient::with_sample_tree(), settings);
        assert_eq!(
            session.connect("ftp.example.com").await,
            ConnectOutcome::Connected
        );
        assert_eq!(
            session.authenticate("bob", "secret").await,
            LoginOutcome::LoggedIn
        );
        assert_eq!(
            session.open_current_directory().await,
            OperationOutcome::Completed
        );
        session
    }

    fn assert_success(session: &Session<MockClient>) {
        assert!(!session.status().message().is_empty());
        assert!(session.status().error().is_empty());
    }

    fn assert_failure(session: &Session<MockClient>) {
        assert!(!session.status().error().is_empty());
        assert!(session.status().message().is_empty());
    }

    #[tokio::test]
    async fn test_connect_to_unreachable_server() {
        let client = MockClient {
            reachable: false,
            ..Default::default()
        };
        let mut session = Session::new(client, TransferSettings::default());

        assert_eq!(
            session.connect("ftp.example.com").await,
            ConnectOutcome::Unavailable
        );
        assert!(!session.is_authenticated());
        assert!(!session.is_connected());
        assert!(session
            .status()
            .error()
            .starts_with("Server unavailable"));
    }

    #[tokio::test]
    async fn test_connect_with_empty_address() {
        let mut session = Session::new(MockClient::with_sample_tree(), TransferSettings::default());
        assert_eq!(session.connect("  ").await, ConnectOutcome::Unavailable);
        assert!(session.client().calls.is_empty());
        assert_failure(&session);
    }

    #[tokio::test]
    async fn test_authenticate_without_connection_reports_protocol_error() {
        let mut session = Session::new(MockClient::with_sample_tree(), TransferSettings::default());
        assert_eq!(
            session.authenticate("bob", "secret").await,
            LoginOutcome::ProtocolError
        );
        assert!(!session.is_authenticated());
        assert_failure(&session);
    }

    #[tokio::test]
    async fn test_authenticate_passes_empty_credentials_through() {
        let mut session = Session::new(MockClient::with_sample_tree(), TransferSettings::default());
        session.connect("ftp.example.com").await;

        assert_eq!(
            session.authenticate("", "").await,
            LoginOutcome::InvalidCredentials
        );
        assert_eq!(session.client().count_calls("login"), 1);
        assert!(!session.is_authenticated());
        assert_failure(&session);
    }

    #[tokio::test]
    async fn test_login_resets_current_directory() {
        let session = logged_in_session(TransferSettings::default()).await;
        assert!(session.is_authenticated());
        assert_eq!(session.current_directory(), "/");
        assert_eq!(
            session.listing().display_lines(),
            vec!["/", "(DIR) reports", "(DIR) archive", "readme.txt"]
        );
    }

    #[tokio::test]
    async fn test_list_requires_connection() {
        let mut session = Session::new(MockClient::with_sample_tree(), TransferSettings::default());
        assert!(matches!(
            session.list_current_directory().await,
            Err(FtpError::NotConnected)
        ));
        assert!(session.client().calls.is_empty());
    }

    #[tokio::test]
    async fn test_enter_directory_builds_child_path() {
        let mut session = logged_in_session(TransferSettings::default()).await;

        assert_eq!(
            session.enter_directory("reports").await,
            OperationOutcome::Completed
        );
        assert_eq!(session.current_directory(), "/reports");
        assert_eq!(session.listing().display_lines(), vec!["/", "q1.csv"]);
        assert_eq!(session.client().cwd, "/reports");
    }

    #[tokio::test]
    async fn test_enter_missing_directory_leaves_attempted_path() {
        let mut session = logged_in_session(TransferSettings::default()).await;

        assert_eq!(
            session.enter_directory("missing").await,
            OperationOutcome::Refused
        );
        // Not rolled back: the session keeps pointing at the attempted path
        // while the listing shows where the server actually is.
        assert_eq!(session.current_directory(), "/missing");
        assert_eq!(session.client().cwd, "/");
        assert_eq!(
            session.listing().display_lines(),
            vec!["/", "(DIR) reports", "(DIR) archive", "readme.txt"]
        );
        assert_failure(&session);
    }

    #[tokio::test]
    async fn test_enter_parent_at_root_only_refreshes() {
        let mut session = logged_in_session(TransferSettings::default()).await;
        let lists_before = session.client().count_calls("list");

        session.enter_parent_directory().await;

        assert_eq!(session.current_directory(), "/");
        assert_eq!(session.client().count_calls("list") - lists_before, 1);
        assert_eq!(session.client().count_calls("cdup"), 0);
    }

    #[tokio::test]
    async fn test_enter_parent_moves_up() {
        let mut session = logged_in_session(TransferSettings::default()).await;
        session.enter_directory("reports").await;

        assert_eq!(
            session.enter_parent_directory().await,
            OperationOutcome::Completed
        );
        assert_eq!(session.current_directory(), "/");
        assert_eq!(session.listing().len(), 4);
        assert_success(&session);
    }

    #[tokio::test]
    async fn test_upload_missing_local_file_makes_no_store_call() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = logged_in_session(settings_in(dir.path())).await;

        let outcome = session.upload(&dir.path().join("does-not-exist.txt")).await;

        assert_eq!(outcome, OperationOutcome::LocalIoFailure);
        assert_eq!(session.client().count_calls("store"), 0);
        assert_failure(&session);
    }

    #[tokio::test]
    async fn test_upload_directory_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = logged_in_session(settings_in(dir.path())).await;

        let outcome = session.upload(dir.path()).await;

        assert_eq!(outcome, OperationOutcome::LocalIoFailure);
        assert_eq!(session.client().count_calls("store"), 0);
    }

    #[tokio::test]
    async fn test_upload_stores_under_base_name() {
        let dir = tempfile::tempdir().unwrap();
        let local = dir.path().join("upload.txt");
        std::fs::write(&local, b"some content longer than the buffer").unwrap();

        let mut session = logged_in_session(settings_in(dir.path())).await;
        session.enter_directory("reports").await;

        assert_eq!(session.upload(&local).await, OperationOutcome::Completed);
        assert_eq!(
            session.client().files.get("/reports/upload.txt").unwrap(),
            b"some content longer than the buffer"
        );
        assert!(session
            .listing()
            .display_lines()
            .contains(&"upload.txt".to_string()));

        let calls = &session.client().calls;
        let binary = calls.iter().rposition(|c| c == "binary").unwrap();
        let store = calls
            .iter()
            .position(|c| c == "store /reports/upload.txt")
            .unwrap();
        assert!(binary < store);
        assert_success(&session);
    }

    #[tokio::test]
    async fn test_download_writes_into_download_dir() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = logged_in_session(settings_in(dir.path())).await;

        let outcome = session.download("readme.txt").await;

        let expected = dir.path().join("readme.txt");
        assert_eq!(outcome, DownloadOutcome::DownloadedOk(expected.clone()));
        assert_eq!(std::fs::read(&expected).unwrap(), b"read me");
        assert_eq!(session.client().count_calls("retrieve /readme.txt"), 1);
        assert_success(&session);
    }

    #[tokio::test]
    async fn test_download_missing_remote_file_is_incomplete() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = logged_in_session(settings_in(dir.path())).await;

        assert_eq!(
            session.download("nope.bin").await,
            DownloadOutcome::DownloadIncomplete
        );
        assert_failure(&session);
    }

    #[tokio::test]
    async fn test_download_interrupted_keeps_partial_file() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = logged_in_session(settings_in(dir.path())).await;
        session.client_mut().truncate_download_at = Some(3);

        assert_eq!(
            session.download("readme.txt").await,
            DownloadOutcome::ConnectionLost
        );
        assert_eq!(std::fs::read(dir.path().join("readme.txt")).unwrap(), b"rea");
        assert_eq!(session.status().error(), "Lost connection with the server.");
        // The listing could not be refreshed on the dead connection
        assert_eq!(session.listing().display_lines(), vec!["/"]);
    }

    #[tokio::test]
    async fn test_download_into_missing_directory_is_local_failure() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = logged_in_session(settings_in(&dir.path().join("gone"))).await;

        assert_eq!(
            session.download("readme.txt").await,
            DownloadOutcome::LocalIoFailure
        );
        assert_eq!(session.client().count_calls("retrieve"), 0);
        assert_failure(&session);
    }

    #[tokio::test]
    async fn test_download_without_connection() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = Session::new(MockClient::with_sample_tree(), settings_in(dir.path()));

        assert_eq!(
            session.download("readme.txt").await,
            DownloadOutcome::ConnectionLost
        );
        assert!(!dir.path().join("readme.txt").exists());
    }

    #[tokio::test]
    async fn test_make_directory() {
        let mut session = logged_in_session(TransferSettings::default()).await;

        assert_eq!(
            session.make_directory("new").await,
            OperationOutcome::Completed
        );
        assert!(session
            .listing()
            .display_lines()
            .contains(&"(DIR) new".to_string()));
        assert_success(&session);

        let lists_before = session.client().count_calls("list");
        assert_eq!(
            session.make_directory("reports").await,
            OperationOutcome::Refused
        );
        assert_eq!(session.client().count_calls("list") - lists_before, 1);
        assert_eq!(session.status().error(), "Failed to create directory");
        assert_failure(&session);
    }

    #[tokio::test]
    async fn test_make_directory_with_empty_name() {
        let mut session = logged_in_session(TransferSettings::default()).await;
        assert_eq!(session.make_directory(" ").await, OperationOutcome::Refused);
        assert_eq!(session.client().count_calls("mkdir"), 0);
    }

    #[tokio::test]
    async fn test_delete_current_directory_moves_to_parent_first() {
        let mut session = logged_in_session(TransferSettings::default()).await;
        session.enter_directory("archive").await;
        let start = session.client().calls.len();

        assert_eq!(
            session.delete_current_directory().await,
            OperationOutcome::Completed
        );

        assert_eq!(
            &session.client().calls[start..],
            &["pwd", "cdup", "pwd", "cwd /", "rmdir /archive", "list"]
        );
        assert_eq!(session.current_directory(), "/");
        assert_eq!(
            session.listing().display_lines(),
            vec!["/", "(DIR) reports", "readme.txt"]
        );
        assert_success(&session);
    }

    #[tokio::test]
    async fn test_delete_non_empty_directory_is_refused() {
        let mut session = logged_in_session(TransferSettings::default()).await;
        session.enter_directory("reports").await;

        assert_eq!(
            session.delete_current_directory().await,
            OperationOutcome::Refused
        );
        assert_eq!(session.current_directory(), "/");
        assert!(session.client().dirs.contains_key("/reports"));
        assert_failure(&session);
    }

    #[tokio::test]
    async fn test_delete_file() {
        let mut session = logged_in_session(TransferSettings::default()).await;

        assert_eq!(
            session.delete_file("readme.txt").await,
            OperationOutcome::Completed
        );
        assert!(!session
            .listing()
            .display_lines()
            .contains(&"readme.txt".to_string()));
        assert_success(&session);

        assert_eq!(
            session.delete_file("readme.txt").await,
            OperationOutcome::Refused
        );
        assert_eq!(session.status().error(), "The file could not be deleted");
    }

    #[tokio::test]
    async fn test_connection_drop_mid_session_fails_gracefully() {
        let mut session = logged_in_session(TransferSettings::default()).await;
        session.client_mut().fail_on = vec!["mkdir"];

        assert_eq!(
            session.make_directory("new").await,
            OperationOutcome::ConnectionLost
        );
        assert_eq!(session.status().error(), "Lost connection with the server.");
        assert_eq!(session.listing().display_lines(), vec!["/"]);

        // Everything afterwards reports a failure instead of panicking
        assert_eq!(
            session.delete_file("readme.txt").await,
            OperationOutcome::ConnectionLost
        );
        assert_eq!(
            session.enter_directory("reports").await,
            OperationOutcome::ConnectionLost
        );
        assert_eq!(
            session.refresh_listing().await,
            OperationOutcome::ConnectionLost
        );
        assert!(session.list_current_directory().await.is_err());
        assert_failure(&session);
    }

    #[tokio::test]
    async fn test_lost_connection_ends_login() {
        let mut session = logged_in_session(TransferSettings::default()).await;
        session.client_mut().fail_on = vec!["mkdir"];

        session.make_directory("x").await;

        assert!(!session.is_connected());
        assert!(!session.is_authenticated());
    }

    #[tokio::test]
    async fn test_reconnect_requires_new_login() {
        let mut session = logged_in_session(TransferSettings::default()).await;
        session.enter_directory("reports").await;

        assert_eq!(
            session.connect("ftp.example.com").await,
            ConnectOutcome::Connected
        );

        assert!(session.is_connected());
        assert!(!session.is_authenticated());
        assert_eq!(session.current_directory(), "/");
        assert!(session.listing().is_empty());
    }

    #[tokio::test]
    async fn test_refused_reply_keeps_session() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = logged_in_session(settings_in(dir.path())).await;
        session.client_mut().reject_on = vec!["binary", "mkdir"];

        assert_eq!(
            session.download("readme.txt").await,
            DownloadOutcome::DownloadIncomplete
        );
        assert_eq!(
            session.status().error(),
            "The server sent an unexpected reply."
        );
        assert_eq!(session.client().count_calls("retrieve"), 0);

        assert_eq!(session.make_directory("new").await, OperationOutcome::Refused);
        assert!(session.is_connected());
        assert!(session.is_authenticated());
        // The listing was refreshed on the live connection
        assert_eq!(session.listing().len(), 4);
        assert_failure(&session);
    }

    #[tokio::test]
    async fn test_logout() {
        let mut session = Session::new(MockClient::with_sample_tree(), TransferSettings::default());
        assert_eq!(session.logout().await, LogoutOutcome::NotConnected);

        let mut session = logged_in_session(TransferSettings::default()).await;
        assert_eq!(session.logout().await, LogoutOutcome::LoggedOut);
        assert!(!session.is_authenticated());
        assert!(session.listing().is_empty());
        assert_success(&session);
    }

    #[tokio::test]
    async fn test_disconnect_is_idempotent() {
        let mut session = logged_in_session(TransferSettings::default()).await;

        session.disconnect().await;
        session.disconnect().await;

        assert_eq!(session.client().count_calls("disconnect"), 1);
        assert!(!session.is_connected());
        assert!(!session.is_authenticated());
        assert!(session.listing().is_empty());
        assert_eq!(session.current_directory(), "/");
    }
}

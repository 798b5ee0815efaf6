mod common;

use anyhow::Result;
use session_scope::session::SessionError;
use session_scope::ScopeError;

#[tokio::test]
async fn refresh_loads_roster_from_session_detail() -> Result<()> {
    let upstream = common::MockUpstream::spawn().await?;
    let client = common::scoped_client(&upstream.base_url, common::SESSION_ID)?;

    assert!(client.session().members.is_empty());

    let snapshot = client.refresh_session().await?;
    assert_eq!(snapshot.session_id, common::SESSION_ID);
    assert_eq!(snapshot.name.as_deref(), Some("Period 3"));
    assert!(snapshot.active);
    assert!(snapshot.is_member("s1"));
    assert!(snapshot.is_member("s2"));
    assert_eq!(snapshot.members.len(), 2);
    assert_eq!(snapshot.controls["locked"], false);

    // The context now hands out the new snapshot
    assert_eq!(client.session().members.len(), 2);
    Ok(())
}

#[tokio::test]
async fn unknown_session_reports_status_and_keeps_roster_empty() -> Result<()> {
    let upstream = common::MockUpstream::spawn().await?;
    let client = common::scoped_client(&upstream.base_url, "sess_missing")?;

    let err = client.refresh_session().await.unwrap_err();
    match err {
        ScopeError::Session(SessionError::Status { session_id, status }) => {
            assert_eq!(session_id, "sess_missing");
            assert_eq!(status, 404);
        }
        other => panic!("unexpected error: {other}"),
    }
    assert!(client.session().members.is_empty());
    Ok(())
}

#[tokio::test]
async fn malformed_detail_is_rejected() -> Result<()> {
    let upstream = common::MockUpstream::spawn().await?;
    let client = common::scoped_client(&upstream.base_url, "sess_malformed")?;

    let err = client.refresh_session().await.unwrap_err();
    assert!(matches!(err, ScopeError::Session(SessionError::Malformed(_))), "got {err}");
    Ok(())
}

#[tokio::test]
async fn failed_refresh_keeps_previous_roster() -> Result<()> {
    let upstream = common::MockUpstream::spawn().await?;
    let client = common::scoped_client(&upstream.base_url, common::SESSION_ID)?;
    client.refresh_session().await?;

    // Upstream error on a second client leaves the first one untouched
    let broken = common::scoped_client(&upstream.base_url, "sess_broken")?;
    let kept = broken.refresh_or_keep().await;
    assert!(kept.members.is_empty());
    assert_eq!(kept.session_id, "sess_broken");

    assert_eq!(client.session().members.len(), 2);
    Ok(())
}

#[tokio::test]
async fn unreachable_upstream_leaves_roster_empty() -> Result<()> {
    let client = common::scoped_client(&common::dead_upstream()?, common::SESSION_ID)?;

    let err = client.refresh_session().await.unwrap_err();
    assert!(err.is_transport(), "expected transport error, got {err}");

    let snapshot = client.refresh_or_keep().await;
    assert!(snapshot.members.is_empty());
    Ok(())
}

#[tokio::test]
async fn missing_session_id_is_an_error() -> Result<()> {
    let upstream = common::MockUpstream::spawn().await?;
    let client = common::scoped_client(&upstream.base_url, "")?;

    let err = client.refresh_session().await.unwrap_err();
    assert!(matches!(err, ScopeError::Session(SessionError::MissingSessionId)));
    Ok(())
}

#[tokio::test]
async fn session_id_is_sent_as_a_single_segment() -> Result<()> {
    let upstream = common::MockUpstream::spawn().await?;
    // Unencoded, the query would be split off and sess_1 loaded instead
    let client = common::scoped_client(&upstream.base_url, "sess_1?x=1")?;

    let err = client.refresh_session().await.unwrap_err();
    assert!(
        matches!(err, ScopeError::Session(SessionError::Status { status: 404, .. })),
        "got {err}"
    );
    assert!(client.session().members.is_empty());
    Ok(())
}

use serde_json::{json, Value};
use std::sync::{Arc, Mutex};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use yt_collect::mock::{MockBatchClient, MockPagedClient};
use yt_collect::{
    get_channel_info, get_comments, get_video_info, get_videos_in_time_range, BatchLimitPolicy,
    CollectError, Collector, CoreError, FieldSelection, ListRequest, Page, PagedListClient,
    Resource, YouTubeClient, YouTubeConfig, COMMENT_PAGE_SIZE, SEARCH_PAGE_SIZE,
};

fn search_hit(video_id: &str) -> Value {
    json!({"kind": "youtube#searchResult", "id": {"kind": "youtube#video", "videoId": video_id}})
}

fn comment_thread(author: &str, text: &str) -> Value {
    json!({
        "snippet": {"topLevelComment": {"snippet": {
            "authorDisplayName": author,
            "publishedAt": "2023-10-01T10:00:00Z",
            "textOriginal": text
        }}}
    })
}

fn video(id: &str) -> Value {
    json!({
        "id": id,
        "snippet": {"title": format!("Video {}", id), "publishedAt": "2023-09-10T00:00:00Z"},
        "contentDetails": {"duration": "PT5M"},
        "statistics": {"viewCount": "10"}
    })
}

fn ids(n: usize) -> Vec<String> {
    (0..n).map(|i| format!("vid{}", i)).collect()
}

#[tokio::test]
async fn test_pagination_follows_cursor_to_the_end() {
    let client = MockPagedClient::new(vec![
        Page::with_next(vec![json!(1), json!(2)], "c1"),
        Page::with_next(vec![json!(3)], "c2"),
        Page::with_next(vec![json!(4), json!(5), json!(6)], "c3"),
        Page::last(vec![json!(7)]),
    ]);
    let request = ListRequest::new(Resource::Search).with_part("snippet");

    let values: Vec<i64> = Collector::new(&client, request)
        .collect(|item| Ok::<_, CollectError>(item.as_i64()))
        .await
        .unwrap();

    assert_eq!(values, vec![1, 2, 3, 4, 5, 6, 7]);
    assert_eq!(client.call_count(), 4);
    assert_eq!(
        client.requested_cursors(),
        vec![
            None,
            Some("c1".to_string()),
            Some("c2".to_string()),
            Some("c3".to_string()),
        ]
    );
}

#[tokio::test]
async fn test_single_page_without_cursor() {
    let client = MockPagedClient::new(vec![Page::last(vec![json!(1), json!(2)])]);
    let request = ListRequest::new(Resource::Search).with_part("snippet");

    let values: Vec<i64> = Collector::new(&client, request)
        .collect(|item| Ok::<_, CollectError>(item.as_i64()))
        .await
        .unwrap();

    assert_eq!(values, vec![1, 2]);
    assert_eq!(client.call_count(), 1);
}

#[tokio::test]
async fn test_empty_token_terminates() {
    let client = MockPagedClient::new(vec![
        Page::with_next(vec![json!(1)], "c1"),
        Page::with_next(vec![json!(2)], ""),
        Page::last(vec![json!(3)]),
    ]);
    let request = ListRequest::new(Resource::Search).with_part("snippet");

    let values: Vec<i64> = Collector::new(&client, request)
        .collect(|item| Ok::<_, CollectError>(item.as_i64()))
        .await
        .unwrap();

    assert_eq!(values, vec![1, 2]);
    assert_eq!(client.call_count(), 2);
}

#[tokio::test]
async fn test_failed_page_discards_partial_results() {
    let client = MockPagedClient::new(vec![
        Page::with_next(vec![comment_thread("@a", "first")], "c1"),
        Page::last(vec![comment_thread("@b", "second")]),
    ])
    .with_failure_on(1);

    let result = get_comments(&client, "vid0").await;

    assert!(matches!(result, Err(CollectError::Api { status: 503, .. })));
    assert_eq!(client.call_count(), 2);
}

#[tokio::test]
async fn test_channel_info_is_one_request() {
    let client = MockPagedClient::new(vec![
        Page::with_next(
            vec![
                json!({
                    "id": "UC1",
                    "snippet": {"title": "Rolling Lab", "country": "BR"},
                    "statistics": {"viewCount": "100", "subscriberCount": "10", "videoCount": "5"}
                }),
                json!({
                    "id": "UC2",
                    "snippet": {"title": "Guard Notes"},
                    "statistics": {"viewCount": "200", "subscriberCount": "20", "videoCount": "6"}
                }),
            ],
            "ignored",
        ),
        Page::last(Vec::new()),
    ]);

    let channels = get_channel_info(&client, &["UC1".to_string(), "UC2".to_string()])
        .await
        .unwrap();

    assert_eq!(client.call_count(), 1);
    assert_eq!(channels.len(), 2);
    assert_eq!(channels[0].country.as_deref(), Some("BR"));
    assert_eq!(channels[1].country, None);

    let request = &client.requests()[0];
    assert_eq!(request.resource(), Resource::Channels);
    assert_eq!(request.part_param(), "snippet,statistics");
    assert_eq!(request.filter("id"), Some("UC1,UC2"));
}

#[tokio::test]
async fn test_channel_info_with_no_ids_skips_request() {
    let client = MockPagedClient::new(Vec::new());

    let channels = get_channel_info(&client, &[]).await.unwrap();

    assert!(channels.is_empty());
    assert_eq!(client.call_count(), 0);
}

#[tokio::test]
async fn test_videos_in_time_range() {
    let client = MockPagedClient::new(vec![
        Page::with_next(vec![search_hit("a"), search_hit("b")], "next"),
        Page::last(vec![search_hit("c")]),
    ]);

    let videos = get_videos_in_time_range(
        &client,
        "UC1",
        "2023-09-09T00:00:00Z",
        "2023-10-09T00:00:00Z",
    )
    .await
    .unwrap();

    assert_eq!(videos, vec!["a", "b", "c"]);

    let request = &client.requests()[0];
    assert_eq!(request.resource(), Resource::Search);
    assert_eq!(request.filter("channelId"), Some("UC1"));
    assert_eq!(request.filter("publishedAfter"), Some("2023-09-09T00:00:00Z"));
    assert_eq!(request.filter("publishedBefore"), Some("2023-10-09T00:00:00Z"));
    assert_eq!(request.filter("type"), Some("video"));
    assert_eq!(request.max_results(), Some(SEARCH_PAGE_SIZE));
}

#[tokio::test]
async fn test_inverted_time_range_makes_no_request() {
    let client = MockPagedClient::new(Vec::new());

    let result = get_videos_in_time_range(
        &client,
        "UC1",
        "2023-10-09T00:00:00Z",
        "2023-09-09T00:00:00Z",
    )
    .await;

    assert!(matches!(result, Err(CollectError::InvalidTimeRange(_))));
    assert_eq!(client.call_count(), 0);
}

#[tokio::test]
async fn test_comments_across_pages() {
    let client = MockPagedClient::new(vec![
        Page::with_next(vec![comment_thread("@a", "one"), comment_thread("@b", "two")], "p2"),
        Page::last(vec![comment_thread("@c", "three")]),
    ]);

    let comments = get_comments(&client, "vid0").await.unwrap();

    let texts: Vec<&str> = comments.iter().map(|c| c.text.as_str()).collect();
    assert_eq!(texts, vec!["one", "two", "three"]);
    assert_eq!(comments[2].author_display_name, "@c");

    let request = &client.requests()[1];
    assert_eq!(request.filter("videoId"), Some("vid0"));
    assert_eq!(request.max_results(), Some(COMMENT_PAGE_SIZE));
}

#[tokio::test]
async fn test_malformed_comment_aborts_collection() {
    let client = MockPagedClient::new(vec![Page::last(vec![
        comment_thread("@a", "fine"),
        json!({"snippet": {}}),
    ])]);

    let result = get_comments(&client, "vid0").await;

    assert!(matches!(
        result,
        Err(CollectError::Core(CoreError::MissingField { .. }))
    ));
}

#[tokio::test]
async fn test_video_info_batch() {
    let client = MockBatchClient::new(vec![video("v1"), video("v2")]);
    let selection = FieldSelection::new()
        .with_snippet(["title", "tags"])
        .with_content(["duration"])
        .with_statistics(["viewCount"]);

    let records = get_video_info(&client, &ids(2), &selection, BatchLimitPolicy::Reject)
        .await
        .unwrap();

    assert_eq!(records.len(), 2);
    assert_eq!(
        records[0].to_row(),
        vec![json!("v1"), json!("Video v1"), Value::Null, json!("PT5M"), json!("10")]
    );

    let (resource, requested, parts) = client.last_call().unwrap();
    assert_eq!(resource, Resource::Videos);
    assert_eq!(requested, ids(2));
    assert_eq!(parts, vec!["snippet", "contentDetails", "statistics"]);
}

#[tokio::test]
async fn test_oversized_batch_rejected() {
    let client = MockBatchClient::new(Vec::new());

    let result = get_video_info(&client, &ids(51), &FieldSelection::new(), BatchLimitPolicy::Reject).await;

    assert!(matches!(
        result,
        Err(CollectError::BatchTooLarge { requested: 51, limit: 50 })
    ));
    assert_eq!(client.call_count(), 0);
}

#[tokio::test]
async fn test_oversized_batch_sent_under_warn_policy() {
    let client = MockBatchClient::new(vec![video("v1")]);

    let records = get_video_info(&client, &ids(51), &FieldSelection::new(), BatchLimitPolicy::Warn)
        .await
        .unwrap();

    assert_eq!(records.len(), 1);
    assert_eq!(client.last_call().unwrap().1.len(), 51);
}

#[tokio::test]
async fn test_exactly_fifty_ids_allowed() {
    let client = MockBatchClient::new(Vec::new());

    let records = get_video_info(&client, &ids(50), &FieldSelection::new(), BatchLimitPolicy::Reject)
        .await
        .unwrap();

    assert!(records.is_empty());
    assert_eq!(client.call_count(), 1);
}

#[tokio::test]
async fn test_missing_statistics_fails_batch() {
    let mut broken = video("v2");
    broken.as_object_mut().unwrap().remove("statistics");
    let client = MockBatchClient::new(vec![video("v1"), broken]);

    let result = get_video_info(&client, &ids(2), &FieldSelection::new(), BatchLimitPolicy::Reject).await;

    match result {
        Err(CollectError::Core(CoreError::MissingStructure { item_id, section })) => {
            assert_eq!(item_id, "v2");
            assert_eq!(section, "statistics");
        }
        other => panic!("expected missing structure, got {:?}", other),
    }
}

/// Serves one canned `(status, body)` response per connection and records request lines
async fn canned_server(responses: Vec<(u16, &'static str)>) -> (YouTubeClient, Arc<Mutex<Vec<String>>>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let requests = Arc::new(Mutex::new(Vec::new()));
    let seen = Arc::clone(&requests);

    tokio::spawn(async move {
        for (status, body) in responses {
            let (mut socket, _) = listener.accept().await.unwrap();

            let mut head = Vec::new();
            let mut buf = [0u8; 1024];
            while !head.windows(4).any(|w| w == b"\r\n\r\n") {
                let n = socket.read(&mut buf).await.unwrap();
                if n == 0 {
                    break;
                }
                head.extend_from_slice(&buf[..n]);
            }
            let request_line = String::from_utf8_lossy(&head)
                .lines()
                .next()
                .unwrap_or_default()
                .to_string();
            seen.lock().unwrap().push(request_line);

            let reason = if status == 200 { "OK" } else { "Error" };
            let response = format!(
                "HTTP/1.1 {} {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status,
                reason,
                body.len(),
                body
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.ok();
        }
    });

    let config = YouTubeConfig::new()
        .with_api_key(Some("test-key".to_string()))
        .with_base_url(format!("http://{}/youtube/v3", addr))
        .with_timeout(5);
    (YouTubeClient::new(config).unwrap(), requests)
}

#[tokio::test]
async fn test_client_maps_cursor_then_api_error() {
    let (client, requests) = canned_server(vec![
        (200, r#"{"nextPageToken":"CDIQAA"}"#),
        (403, r#"{"error":"quotaExceeded"}"#),
    ])
    .await;
    let request = ListRequest::new(Resource::CommentThreads)
        .with_part("snippet")
        .with_filter("videoId", "vid1");

    // Missing `items` reads as an empty page
    let page = client.list_page(&request, None).await.unwrap();
    assert!(page.items.is_empty());
    assert_eq!(page.next_cursor.as_ref().map(|c| c.as_str()), Some("CDIQAA"));

    let err = client
        .list_page(&request, page.next_cursor.as_ref())
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        CollectError::Api { status: 403, ref body } if body.contains("quotaExceeded")
    ));

    let requests = requests.lock().unwrap();
    assert_eq!(requests.len(), 2);
    assert!(requests[0].starts_with("GET /youtube/v3/commentThreads?part=snippet&videoId=vid1"));
    assert!(!requests[0].contains("pageToken"));
    assert!(requests[1].contains("pageToken=CDIQAA"));
    assert!(requests[1].contains("key=test-key"));
}

#[tokio::test]
async fn test_client_empty_next_token_ends_collection() {
    let (client, requests) = canned_server(vec![
        (
            200,
            r#"{"items":[{"snippet":{"topLevelComment":{"snippet":{"authorDisplayName":"@a","publishedAt":"2023-10-01T10:00:00Z","textOriginal":"first"}}}}],"nextPageToken":"p2"}"#,
        ),
        (
            200,
            r#"{"items":[{"snippet":{"topLevelComment":{"snippet":{"authorDisplayName":"@b","publishedAt":"2023-10-02T10:00:00Z","textOriginal":"second"}}}}],"nextPageToken":""}"#,
        ),
    ])
    .await;

    let comments = get_comments(&client, "vid1").await.unwrap();

    let texts: Vec<&str> = comments.iter().map(|c| c.text.as_str()).collect();
    assert_eq!(texts, vec!["first", "second"]);
    assert_eq!(requests.lock().unwrap().len(), 2);
}

#[tokio::test]
async fn test_client_malformed_body_is_json_error() {
    let (client, _requests) = canned_server(vec![(200, "not json")]).await;
    let request = ListRequest::new(Resource::Channels).with_part("snippet");

    let result = client.list_page(&request, None).await;

    assert!(matches!(result, Err(CollectError::Json(_))));
}

#[tokio::test]
async fn test_client_batch_request_carries_parts_and_ids() {
    let (client, requests) = canned_server(vec![(
        200,
        r#"{"items":[{"id":"a","snippet":{"title":"A"},"contentDetails":{},"statistics":{"viewCount":"3"}}]}"#,
    )])
    .await;
    let ids = vec!["a".to_string(), "b".to_string()];
    let selection = FieldSelection::new()
        .with_snippet(["title"])
        .with_statistics(["viewCount"]);

    let records = get_video_info(&client, &ids, &selection, BatchLimitPolicy::Reject)
        .await
        .unwrap();

    assert_eq!(records.len(), 1);
    assert_eq!(records[0].to_row(), vec![json!("a"), json!("A"), json!("3")]);

    let requests = requests.lock().unwrap();
    assert!(requests[0].starts_with(
        "GET /youtube/v3/videos?part=snippet%2CcontentDetails%2Cstatistics&id=a%2Cb&key=test-key"
    ));
}

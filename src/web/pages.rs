use axum::response::Html;
use once_cell::sync::Lazy;

const LAYOUT: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <meta name="viewport" content="width=device-width, initial-scale=1">
  <title>{{title}}</title>
  <script src="/static/js/main.js" defer></script>
</head>
<body>
  <nav><a href="/">Dashboard</a> | <a href="/chat">Chat</a> | <a href="/chat/test">Connectivity test</a></nav>
  <main>
{{body}}
  </main>
</body>
</html>
"#;

const DASHBOARD: &str = r#"    <h1>Hello World from Reckie!</h1>
    <p data-testid="hello-world-message">System is running successfully</p>
    <div id="status">AI-native requirements engineering platform</div>"#;

const CHAT: &str = r#"    <h1>AI Chat Interface</h1>
    <form id="start-form">
      <select name="document_type">
        <option value="">General</option>
        <option value="vision">Vision</option>
        <option value="requirements">Requirements</option>
        <option value="user_story">User story</option>
      </select>
      <button type="submit">Start conversation</button>
    </form>
    <div id="messages"></div>
    <form id="send-form">
      <textarea name="message" maxlength="2000"></textarea>
      <button type="submit">Send</button>
    </form>
    <script>
      let conversationId = null;
      const post = (url, form) => fetch(url, { method: 'POST', body: new URLSearchParams(new FormData(form)) }).then(r => r.json());
      const log = (role, text) => {
        const p = document.createElement('p');
        p.textContent = role + ': ' + text;
        document.getElementById('messages').appendChild(p);
      };
      document.getElementById('start-form').addEventListener('submit', async (e) => {
        e.preventDefault();
        const data = await post('/chat/start', e.target);
        conversationId = data.conversation_id;
        log('system', data.message);
      });
      document.getElementById('send-form').addEventListener('submit', async (e) => {
        e.preventDefault();
        if (!conversationId) return;
        const form = new FormData(e.target);
        form.append('conversation_id', conversationId);
        log('user', form.get('message'));
        const res = await fetch('/chat/send', { method: 'POST', body: new URLSearchParams(form) }).then(r => r.json());
        log('assistant', res.success ? res.response : res.error.message);
        e.target.reset();
      });
    </script>"#;

const CHAT_TEST: &str = r#"    <h1>AI Connectivity Test</h1>
    <form id="echo-form">
      <input name="message" placeholder="Say something">
      <button type="submit">Echo</button>
    </form>
    <pre id="result"></pre>
    <script>
      document.getElementById('echo-form').addEventListener('submit', async (e) => {
        e.preventDefault();
        const res = await fetch('/chat/test/echo', { method: 'POST', body: new URLSearchParams(new FormData(e.target)) });
        document.getElementById('result').textContent = JSON.stringify(await res.json(), null, 2);
      });
    </script>"#;

fn render(title: &str, body: &str) -> String {
    LAYOUT.replace("{{title}}", title).replace("{{body}}", body)
}

static DASHBOARD_PAGE: Lazy<String> = Lazy::new(|| render("Reckie - Dashboard", DASHBOARD));
static CHAT_PAGE: Lazy<String> = Lazy::new(|| render("AI Chat - Reckie", CHAT));
static CHAT_TEST_PAGE: Lazy<String> = Lazy::new(|| render("AI Test - Reckie", CHAT_TEST));

pub async fn dashboard() -> Html<&'static str> {
    Html(DASHBOARD_PAGE.as_str())
}

pub async fn chat() -> Html<&'static str> {
    Html(CHAT_PAGE.as_str())
}

pub async fn chat_test() -> Html<&'static str> {
    Html(CHAT_TEST_PAGE.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_fills_placeholders() {
        assert!(DASHBOARD_PAGE.contains("<title>Reckie - Dashboard</title>"));
        assert!(DASHBOARD_PAGE.contains("System is running successfully"));
        assert!(CHAT_PAGE.contains("/chat/send"));
        assert!(!CHAT_TEST_PAGE.contains("{{"));
    }
}

//! Index page listing the overlay routes.

use wasm_bindgen::prelude::*;

use crate::dom;

const ROUTES: [(&str, &str); 5] = [
    ("/ticker", "滚动字幕 Ticker"),
    ("/statusbar", "状态栏 Status Bar"),
    ("/message", "消息框 Message Box"),
    ("/progress", "直播进度 Stream Progress"),
    ("/clock", "时钟 Clock"),
];

pub fn render_home(root_id: &str) -> Result<(), JsValue> {
    let root = dom::root(root_id)?;
    root.set_inner_html("");

    let container = dom::overlay_container(&root, "max-width:400px;margin:40px auto;")?;
    let title = dom::styled_child(&container, "h1", "margin:0;font-size:24px;")?;
    title.set_text_content(Some("Stream Overlay"));
    let hint = dom::styled_child(
        &container,
        "p",
        "margin:0;font-size:14px;color:rgba(255,255,255,0.6);",
    )?;
    hint.set_text_content(Some("每个路由都是一个独立的浏览器源，通过 URL 参数配置。"));

    for (path, label) in ROUTES {
        let link = dom::styled_child(
            &container,
            "a",
            "color:#60a5fa;font-size:16px;text-decoration:none;",
        )?;
        link.set_attribute("href", path)?;
        link.set_text_content(Some(label));
    }
    Ok(())
}

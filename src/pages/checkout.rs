//! 购物车结账页
//!
//! 结账只推进到扣款确认页面，"Deduct from Account" 按钮永远不会被点击。

use tracing::{debug, info};

use crate::error::PageResult;
use crate::pages::PageContext;

const SELECT_ALL: &str = "input[name='selectAll']";
const SELECT_ALL_CHECKED: &str = "input[name='selectAll']:checked";
const SAVE_AND_CHECKOUT: &str = "input[type='submit'][value='Save and Checkout']";
const PROCEED_TO_CHARGE: &str = "input[type='button'][value='Proceed to Charge']";
const DEDUCT_FROM_ACCOUNT: &str = "input[name='Button'][value='Deduct from Account']";
const DELETE_ALL: &str = "div[align='right'] a";

fn item_checkbox(rank: usize) -> String {
    format!("input[name='selectcheckout_{}']", rank)
}

pub struct CheckoutPage<'a> {
    cx: PageContext<'a>,
}

impl<'a> CheckoutPage<'a> {
    pub fn new(cx: PageContext<'a>) -> Self {
        Self { cx }
    }

    pub fn context(&self) -> PageContext<'a> {
        self.cx
    }

    /// 删除购物车中的全部文件
    pub async fn clear(&self) -> PageResult<()> {
        let session = self.cx.session;
        session.wait_for(DELETE_ALL, self.cx.timeouts.page).await?;
        session.accept_dialogs().await?;
        session.click(DELETE_ALL).await?;
        info!("🗑️ 已清空购物车");
        Ok(())
    }

    /// 勾选前 `batch_size` 份文件并推进到扣款确认页面
    ///
    /// 返回勾选的份数；购物车为空时返回 0 且不做任何操作。
    pub async fn checkout(&self, batch_size: usize) -> PageResult<usize> {
        let session = self.cx.session;
        match session.wait_for(SELECT_ALL, self.cx.timeouts.results).await {
            Ok(()) => {}
            Err(e) if e.is_session_lost() => return Err(e),
            Err(_) => {
                info!("购物车为空，跳过结账");
                return Ok(0);
            }
        }

        self.deselect_all().await?;

        let mut selected = 0;
        for rank in 1..=batch_size {
            let checkbox = item_checkbox(rank);
            if session.count(&checkbox).await? == 0 {
                break;
            }
            session.click(&checkbox).await?;
            selected += 1;
        }
        if selected == 0 {
            return Ok(0);
        }
        debug!("已勾选 {} 份文件", selected);

        session.wait_for(SAVE_AND_CHECKOUT, self.cx.timeouts.page).await?;
        session.click(SAVE_AND_CHECKOUT).await?;
        session.wait_for(PROCEED_TO_CHARGE, self.cx.timeouts.page).await?;
        session.click(PROCEED_TO_CHARGE).await?;
        session.wait_for(DEDUCT_FROM_ACCOUNT, self.cx.timeouts.page).await?;

        info!("💳 {} 份文件已进入扣款确认页面，请人工完成付款", selected);
        Ok(selected)
    }

    /// "全选" 勾选时点一次即全部取消，否则点两次
    async fn deselect_all(&self) -> PageResult<()> {
        let session = self.cx.session;
        let clicks = if session.count(SELECT_ALL_CHECKED).await? > 0 {
            1
        } else {
            2
        };
        for _ in 0..clicks {
            session.click(SELECT_ALL).await?;
        }
        Ok(())
    }
}

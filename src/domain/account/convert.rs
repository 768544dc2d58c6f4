use super::AccountBalance;

impl AccountBalance {
    /// Detail lines without their own update time take the account's.
    pub(crate) fn inherit_update_time(mut self) -> Self {
        let parent = self.u_time;
        for detail in &mut self.details {
            if detail.u_time.is_none() {
                detail.u_time = parent;
            }
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_details_inherit_update_time() {
        let balance: AccountBalance = serde_json::from_str(
            r#"{"totalEq":"41624.32","uTime":"1614846244194","details":[
                {"ccy":"BTC","eq":"1.1","uTime":""},
                {"ccy":"USDT","eq":"200","uTime":"1614846244000"}]}"#,
        )
        .unwrap();
        let balance = balance.inherit_update_time();
        assert_eq!(balance.details[0].u_time, balance.u_time);
        assert_eq!(
            balance.details[1].u_time.map(|t| t.timestamp_millis()),
            Some(1614846244000)
        );
    }
}

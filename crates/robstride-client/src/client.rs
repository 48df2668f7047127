//! 事务客户端
//!
//! 每个操作都是一次阻塞的请求-应答事务：发送一帧，接收（含错误帧重试），
//! 校验应答 ID，再解析数据。

use crate::recv::receive_with_retry;
use crate::{ClientConfig, ClientError, ClientStats};
use robstride_can::{CanAdapter, RobstrideFrame};
use robstride_protocol::{
    DisableCommand, EnableCommand, FeedbackResp, MessageType, MotorModel, ParamRef, ParamValue,
    ReadParamCommand, ReadParamResponse, SetIdCommand, WriteParamCommand, normalize,
    validate_response,
};
use tracing::debug;

/// RobStride 电机客户端
///
/// 持有一个已打开的 CAN 适配器；所有事务都需要 `&mut self`，
/// 同一时刻只有一个事务在进行。
///
/// # Example
///
/// ```no_run
/// # #[cfg(target_os = "linux")]
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// use robstride_can::SocketCanAdapter;
/// use robstride_client::Client;
/// use robstride_protocol::RunMode;
///
/// let mut client = Client::new(SocketCanAdapter::new("can0")?);
/// let feedback = client.enable(0x7F)?;
/// println!("angle: {:.3} rad", feedback.angle);
///
/// client.write_param(0x7F, "run_mode", RunMode::Speed)?;
/// let speed = client.read_param(0x7F, "mechvel")?;
/// println!("mechvel: {}", speed);
/// # Ok(())
/// # }
/// # #[cfg(not(target_os = "linux"))]
/// # fn main() {}
/// ```
#[derive(Debug)]
pub struct Client<A: CanAdapter> {
    adapter: A,
    config: ClientConfig,
    stats: ClientStats,
}

impl<A: CanAdapter> Client<A> {
    /// 使用默认配置创建客户端
    pub fn new(adapter: A) -> Self {
        Self::with_config(adapter, ClientConfig::default())
    }

    pub fn with_config(adapter: A, config: ClientConfig) -> Self {
        Self {
            adapter,
            config,
            stats: ClientStats::default(),
        }
    }

    /// 使能电机（型号 1）
    pub fn enable(&mut self, motor_id: u8) -> Result<FeedbackResp, ClientError> {
        self.enable_with_model(motor_id, MotorModel::default())
    }

    /// 使能电机，按指定型号换算反馈
    pub fn enable_with_model(
        &mut self,
        motor_id: u8,
        model: MotorModel,
    ) -> Result<FeedbackResp, ClientError> {
        debug!("Enable motor {}", motor_id);
        let frame = EnableCommand::new(self.config.host_can_id, motor_id).to_frame();
        self.feedback_transaction(frame, motor_id, model)
    }

    /// 失能电机（型号 1）
    pub fn disable(&mut self, motor_id: u8) -> Result<FeedbackResp, ClientError> {
        self.disable_with_model(motor_id, MotorModel::default())
    }

    pub fn disable_with_model(
        &mut self,
        motor_id: u8,
        model: MotorModel,
    ) -> Result<FeedbackResp, ClientError> {
        debug!("Disable motor {}", motor_id);
        let frame = DisableCommand::new(self.config.host_can_id, motor_id).to_frame();
        self.feedback_transaction(frame, motor_id, model)
    }

    /// 修改电机 CAN ID
    ///
    /// 只等待一帧应答，不解析其内容。
    pub fn update_id(&mut self, motor_id: u8, new_motor_id: u8) -> Result<(), ClientError> {
        debug!("Update motor id {} -> {}", motor_id, new_motor_id);
        let frame = SetIdCommand::new(self.config.host_can_id, motor_id, new_motor_id).to_frame();
        self.transact(frame)?;
        Ok(())
    }

    /// 读取单个参数
    ///
    /// `param` 可以是参数 ID（`u16`）或参数名（如 `"mechvel"`）。
    ///
    /// # 错误
    /// - `ProtocolError::UnknownParameter`: 参数名不存在（此时不发送任何帧）
    /// - `ProtocolError::Mismatch` / `ParamMismatch`: 应答与请求不符
    pub fn read_param<'a>(
        &mut self,
        motor_id: u8,
        param: impl Into<ParamRef<'a>>,
    ) -> Result<ParamValue, ClientError> {
        let param_id = normalize(param)?;
        debug!("Read param 0x{:04X} from motor {}", param_id, motor_id);

        let frame = ReadParamCommand::new(self.config.host_can_id, motor_id, param_id).to_frame();
        let reply = self.transact(frame)?;
        validate_response(&reply, MessageType::ReadParam, motor_id, self.config.host_can_id)?;

        Ok(ReadParamResponse::parse(&reply, param_id)?.value)
    }

    /// 写入单个参数（型号 1）
    ///
    /// 电机以反馈帧应答。
    pub fn write_param<'a>(
        &mut self,
        motor_id: u8,
        param: impl Into<ParamRef<'a>>,
        value: impl Into<ParamValue>,
    ) -> Result<FeedbackResp, ClientError> {
        self.write_param_with_model(motor_id, param, value, MotorModel::default())
    }

    pub fn write_param_with_model<'a>(
        &mut self,
        motor_id: u8,
        param: impl Into<ParamRef<'a>>,
        value: impl Into<ParamValue>,
        model: MotorModel,
    ) -> Result<FeedbackResp, ClientError> {
        let param_id = normalize(param)?;
        let value = value.into();
        debug!("Write param 0x{:04X} = {} to motor {}", param_id, value, motor_id);

        let frame =
            WriteParamCommand::new(self.config.host_can_id, motor_id, param_id, value)?.to_frame();
        self.feedback_transaction(frame, motor_id, model)
    }

    /// 错误帧比例，尚未接收过任何帧时返回 `None`
    pub fn error_rate(&self) -> Option<f64> {
        self.stats.error_rate()
    }

    pub fn stats(&self) -> ClientStats {
        self.stats
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// 取回 CAN 适配器
    pub fn into_inner(self) -> A {
        self.adapter
    }

    /// 发送一帧并等待应答
    fn transact(&mut self, frame: RobstrideFrame) -> Result<RobstrideFrame, ClientError> {
        self.adapter.send(frame)?;
        receive_with_retry(&mut self.adapter, &self.config, &mut self.stats)
    }

    /// 发送一帧，等待并解析反馈帧应答
    fn feedback_transaction(
        &mut self,
        frame: RobstrideFrame,
        motor_id: u8,
        model: MotorModel,
    ) -> Result<FeedbackResp, ClientError> {
        let reply = self.transact(frame)?;
        validate_response(&reply, MessageType::Feedback, motor_id, self.config.host_can_id)?;
        Ok(FeedbackResp::decode(&reply, model)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use robstride_can::{CanError, MockCanAdapter};
    use robstride_protocol::{
        ArbitrationId, IdField, MotorError, PARAM_RUN_MODE, ProtocolError, RunMode,
        encode_message_id,
    };
    use std::time::Duration;

    const HOST: u8 = 0xAA;
    const MOTOR: u8 = 0x7F;

    /// 电机应答：byte 1 = 电机 ID，byte 0 = 主机 ID
    fn reply(message_type: MessageType, motor_id: u8, data: &[u8]) -> RobstrideFrame {
        RobstrideFrame::new_extended(encode_message_id(message_type, motor_id as u16, HOST), data)
    }

    /// 角度/速度/力矩居中，温度 30.0 °C
    const CENTERED: [u8; 8] = [0x80, 0x00, 0x80, 0x00, 0x80, 0x00, 0x01, 0x2C];

    fn client_with(adapter: &mut MockCanAdapter) -> Client<&mut MockCanAdapter> {
        Client::new(adapter)
    }

    #[test]
    fn test_enable() {
        let mut adapter = MockCanAdapter::new();
        adapter.push_frame(reply(MessageType::Feedback, MOTOR, &CENTERED));

        let feedback = client_with(&mut adapter).enable(MOTOR).unwrap();
        assert_eq!(feedback.motor_id, MOTOR);
        assert!(feedback.angle.abs() < 1e-3);
        assert!(feedback.velocity.abs() < 1e-2);
        assert!((feedback.temperature - 30.0).abs() < 1e-9);
        assert!(!feedback.has_errors());

        assert_eq!(adapter.sent().len(), 1);
        assert_eq!(adapter.sent()[0].id, 0x0300_AA7F);
        assert_eq!(adapter.sent()[0].data, [0; 8]);
    }

    #[test]
    fn test_disable_reports_faults() {
        let mut adapter = MockCanAdapter::new();
        let id = encode_message_id(MessageType::Feedback, MOTOR as u16, HOST) | (0b100 << 16);
        adapter.push_frame(RobstrideFrame::new_extended(id, &CENTERED));

        let feedback = client_with(&mut adapter).disable(MOTOR).unwrap();
        assert!(feedback.errors.contains(MotorError::Overtemp));
        assert_eq!(adapter.sent()[0].id, 0x0400_AA7F);
    }

    #[test]
    fn test_enable_with_model_changes_scaling() {
        let data = [0x80, 0x00, 0xFF, 0xFF, 0xFF, 0xFF, 0x00, 0x00];

        let mut adapter = MockCanAdapter::new();
        adapter
            .push_frame(reply(MessageType::Feedback, MOTOR, &data))
            .push_frame(reply(MessageType::Feedback, MOTOR, &data));
        let mut client = client_with(&mut adapter);

        let model_1 = client.enable(MOTOR).unwrap();
        let model_2 = client.enable_with_model(MOTOR, MotorModel(2)).unwrap();
        assert!((model_1.velocity - 44.0).abs() < 1e-9);
        assert!((model_2.velocity - 15.0).abs() < 1e-9);
        assert!((model_1.torque - 17.0).abs() < 1e-9);
        assert!((model_2.torque - 120.0).abs() < 1e-9);
    }

    #[test]
    fn test_enable_wrong_motor() {
        let mut adapter = MockCanAdapter::new();
        adapter.push_frame(reply(MessageType::Feedback, 0x01, &CENTERED));

        let err = client_with(&mut adapter).enable(MOTOR).unwrap_err();
        assert!(err.is_mismatch());
        assert!(matches!(
            err,
            ClientError::Protocol(ProtocolError::Mismatch {
                field: IdField::MotorId,
                expected: MOTOR,
                actual: 0x01
            })
        ));
    }

    #[test]
    fn test_enable_no_response() {
        let mut adapter = MockCanAdapter::new();
        let mut client = client_with(&mut adapter);
        assert!(matches!(client.enable(MOTOR), Err(ClientError::NoResponse)));
        assert_eq!(client.stats().recv_count, 1);
        assert_eq!(client.error_rate(), Some(0.0));
    }

    #[test]
    fn test_send_failure_propagates() {
        let mut adapter = MockCanAdapter::new();
        adapter.close();
        let err = client_with(&mut adapter).enable(MOTOR).unwrap_err();
        assert!(matches!(err, ClientError::Can(CanError::NotStarted)));
        assert_eq!(adapter.receive_calls(), 0);
    }

    #[test]
    fn test_update_id_ignores_payload() {
        let mut adapter = MockCanAdapter::new();
        adapter.push_frame(RobstrideFrame::new_extended(0x0000_05FE, &[0xDE, 0xAD]));

        client_with(&mut adapter).update_id(0x01, 0x05).unwrap();
        assert_eq!(adapter.sent()[0].id, 0x0705_AA01);
    }

    #[test]
    fn test_update_id_no_response() {
        let mut adapter = MockCanAdapter::new();
        assert!(matches!(
            client_with(&mut adapter).update_id(0x01, 0x05),
            Err(ClientError::NoResponse)
        ));
    }

    #[test]
    fn test_read_param_by_name() {
        let mut data = [0x1B, 0x70, 0, 0, 0, 0, 0, 0];
        data[4..8].copy_from_slice(&12.5f32.to_le_bytes());

        let mut adapter = MockCanAdapter::new();
        adapter.push_frame(reply(MessageType::ReadParam, MOTOR, &data));

        let value = client_with(&mut adapter).read_param(MOTOR, "mechvel").unwrap();
        assert_eq!(value, ParamValue::Float(12.5));

        let sent = adapter.sent()[0];
        assert_eq!(ArbitrationId::decode(sent.id).message_type, 17);
        assert_eq!(sent.data, [0x1B, 0x70, 0, 0, 0, 0, 0, 0]);
    }

    #[test]
    fn test_read_run_mode_by_id() {
        let mut adapter = MockCanAdapter::new();
        adapter.push_frame(reply(
            MessageType::ReadParam,
            MOTOR,
            &[0x05, 0x70, 0, 0, 2, 0, 0, 0],
        ));

        let value = client_with(&mut adapter).read_param(MOTOR, PARAM_RUN_MODE).unwrap();
        assert_eq!(value.as_mode(), Some(RunMode::Speed));
    }

    #[test]
    fn test_read_param_echo_mismatch() {
        let mut adapter = MockCanAdapter::new();
        adapter.push_frame(reply(
            MessageType::ReadParam,
            MOTOR,
            &[0x1C, 0x70, 0, 0, 0, 0, 0, 0],
        ));

        let err = client_with(&mut adapter).read_param(MOTOR, 0x701Bu16).unwrap_err();
        assert!(matches!(
            err,
            ClientError::Protocol(ProtocolError::ParamMismatch {
                expected: 0x701B,
                actual: 0x701C
            })
        ));
    }

    #[test]
    fn test_read_param_feedback_reply_rejected() {
        let mut adapter = MockCanAdapter::new();
        adapter.push_frame(reply(MessageType::Feedback, MOTOR, &CENTERED));

        let err = client_with(&mut adapter).read_param(MOTOR, "mechvel").unwrap_err();
        assert!(matches!(
            err,
            ClientError::Protocol(ProtocolError::Mismatch {
                field: IdField::MessageType,
                ..
            })
        ));
    }

    #[test]
    fn test_unknown_param_sends_nothing() {
        let mut adapter = MockCanAdapter::new();
        let err = client_with(&mut adapter).read_param(MOTOR, "nonexistent").unwrap_err();
        assert!(matches!(
            err,
            ClientError::Protocol(ProtocolError::UnknownParameter(_))
        ));
        assert!(adapter.sent().is_empty());
    }

    #[test]
    fn test_write_run_mode() {
        let mut adapter = MockCanAdapter::new();
        adapter.push_frame(reply(MessageType::Feedback, MOTOR, &CENTERED));

        client_with(&mut adapter)
            .write_param(MOTOR, "run_mode", RunMode::Speed)
            .unwrap();

        let sent = adapter.sent()[0];
        assert_eq!(sent.id, 0x1200_AA7F);
        assert_eq!(&sent.data[4..8], &[2, 0, 0, 0]);
    }

    #[test]
    fn test_write_run_mode_raw_byte() {
        let mut adapter = MockCanAdapter::new();
        adapter.push_frame(reply(MessageType::Feedback, MOTOR, &CENTERED));

        client_with(&mut adapter)
            .write_param(MOTOR, PARAM_RUN_MODE, 1u8)
            .unwrap();
        assert_eq!(adapter.sent()[0].data, [0x05, 0x70, 0, 0, 1, 0, 0, 0]);
    }

    #[test]
    fn test_zero_timeout_reaches_adapter() {
        let mut adapter = MockCanAdapter::new();
        let config = ClientConfig::default().with_recv_timeout(Duration::ZERO);
        let result = Client::with_config(&mut adapter, config).enable(MOTOR);

        assert!(matches!(result, Err(ClientError::NoResponse)));
        assert_eq!(adapter.last_timeout(), Some(Duration::ZERO));
    }

    #[test]
    fn test_write_float_param() {
        let mut adapter = MockCanAdapter::new();
        adapter.push_frame(reply(MessageType::Feedback, MOTOR, &CENTERED));

        let feedback = client_with(&mut adapter)
            .write_param(MOTOR, "spd_ref", 1.5f32)
            .unwrap();
        assert_eq!(feedback.motor_id, MOTOR);
        assert_eq!(&adapter.sent()[0].data[4..8], &1.5f32.to_le_bytes());
    }

    #[test]
    fn test_write_value_kind_mismatch_sends_nothing() {
        let mut adapter = MockCanAdapter::new();
        let err = client_with(&mut adapter)
            .write_param(MOTOR, "run_mode", 2.0f32)
            .unwrap_err();
        assert!(matches!(
            err,
            ClientError::Protocol(ProtocolError::InvalidParamValue { .. })
        ));
        assert!(adapter.sent().is_empty());
    }

    #[test]
    fn test_error_frames_counted_across_transactions() {
        let mut adapter = MockCanAdapter::new();
        adapter
            .push_error_frames(1)
            .push_frame(reply(MessageType::Feedback, MOTOR, &CENTERED))
            .push_frame(reply(MessageType::Feedback, MOTOR, &CENTERED));
        let mut client = client_with(&mut adapter);

        assert_eq!(client.error_rate(), None);
        client.enable(MOTOR).unwrap();
        client.disable(MOTOR).unwrap();

        let stats = client.stats();
        assert_eq!(stats.recv_count, 3);
        assert_eq!(stats.recv_error_count, 1);
        assert!((client.error_rate().unwrap() - 1.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_custom_config() {
        let config = ClientConfig::default()
            .with_host_can_id(0xFD)
            .with_recv_timeout(Duration::from_millis(50));
        let mut client = Client::with_config(MockCanAdapter::new(), config);
        assert_eq!(client.config().host_can_id, 0xFD);

        let _ = client.enable(MOTOR);
        let adapter = client.into_inner();
        assert_eq!(adapter.sent()[0].id, 0x0300_FD7F);
        assert_eq!(adapter.last_timeout(), Some(Duration::from_millis(50)));
    }
}
